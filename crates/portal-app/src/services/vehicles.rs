//! Vehicle registry use cases

use std::sync::Arc;

use portal_domain::repository::VehicleRepository;
use portal_types::{Error, NewVehicle, Result, Vehicle, VehicleUpdate};

#[derive(Clone)]
pub struct VehicleService {
    repo: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repo: Arc<dyn VehicleRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Result<Vec<Vehicle>> {
        self.repo.find_all()
    }

    pub fn get(&self, id: i64) -> Result<Vehicle> {
        self.repo.find_by_id(id)?.ok_or(Error::not_found("vehicle", id))
    }

    pub fn create(&self, mut vehicle: NewVehicle) -> Result<Vehicle> {
        vehicle.plate_number = validate_plate(&vehicle.plate_number)?;
        let created = self.repo.create(vehicle)?;
        tracing::info!(id = created.id, plate = %created.plate_number, "vehicle registered");
        Ok(created)
    }

    pub fn update(&self, id: i64, mut update: VehicleUpdate) -> Result<Vehicle> {
        if let Some(ref plate) = update.plate_number {
            update.plate_number = Some(validate_plate(plate)?);
        }
        self.repo.update(id, update)?.ok_or(Error::not_found("vehicle", id))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id)? {
            return Err(Error::not_found("vehicle", id));
        }
        tracing::info!(id, "vehicle deleted");
        Ok(())
    }
}

fn validate_plate(plate: &str) -> Result<String> {
    let plate = plate.trim();
    if plate.is_empty() {
        return Err(Error::validation("plate number must not be empty"));
    }
    Ok(plate.to_string())
}
