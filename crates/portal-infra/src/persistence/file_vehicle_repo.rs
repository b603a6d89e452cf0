//! File-based implementation of VehicleRepository

use std::path::Path;
use std::sync::Mutex;

use portal_domain::repository::VehicleRepository;
use portal_store::VehicleStore;
use portal_types::{NewVehicle, Result, Vehicle, VehicleUpdate};

use super::lock;

pub struct FileVehicleRepository {
    store: Mutex<VehicleStore>,
}

impl FileVehicleRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(VehicleStore::open(store_dir)?),
        })
    }
}

impl VehicleRepository for FileVehicleRepository {
    fn find_all(&self) -> Result<Vec<Vehicle>> {
        let store = lock(&self.store, "vehicles")?;
        Ok(store.all().into_iter().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>> {
        Ok(lock(&self.store, "vehicles")?.get(id).cloned())
    }

    fn create(&self, vehicle: NewVehicle) -> Result<Vehicle> {
        lock(&self.store, "vehicles")?.add(vehicle)
    }

    fn update(&self, id: i64, update: VehicleUpdate) -> Result<Option<Vehicle>> {
        lock(&self.store, "vehicles")?.update(id, &update)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        lock(&self.store, "vehicles")?.remove(id)
    }
}
