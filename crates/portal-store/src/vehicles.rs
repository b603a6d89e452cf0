//! Vehicle store for field vehicles

use std::path::Path;

use chrono::Utc;

use portal_types::{NewVehicle, Result, Vehicle, VehicleUpdate};

use crate::table::{Record, Table};

impl Record for Vehicle {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Persistent store for registered vehicles
pub struct VehicleStore {
    table: Table<Vehicle>,
}

impl VehicleStore {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            table: Table::open(store_dir, "vehicles.json")?,
        })
    }

    pub fn add(&mut self, new: NewVehicle) -> Result<Vehicle> {
        self.table.insert_with(|id| Vehicle {
            id,
            plate_number: new.plate_number,
            model: new.model,
            team: new.team,
            driver: new.driver,
            notes: new.notes,
            created_at: Utc::now(),
        })
    }

    pub fn get(&self, id: i64) -> Option<&Vehicle> {
        self.table.get(id)
    }

    /// All vehicles sorted by plate number
    pub fn all(&self) -> Vec<&Vehicle> {
        let mut vehicles: Vec<_> = self.table.iter().collect();
        vehicles.sort_by(|a, b| a.plate_number.cmp(&b.plate_number));
        vehicles
    }

    pub fn update(&mut self, id: i64, update: &VehicleUpdate) -> Result<Option<Vehicle>> {
        self.table.update(id, |vehicle| update.apply_to(vehicle))
    }

    pub fn remove(&mut self, id: i64) -> Result<bool> {
        Ok(self.table.remove(id)?.is_some())
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_update_remove() {
        let dir = tempdir().unwrap();
        let mut store = VehicleStore::open(dir.path()).unwrap();
        let vehicle = store
            .add(NewVehicle {
                plate_number: "12가 3456".to_string(),
                model: Some("포터".to_string()),
                team: None,
                driver: None,
                notes: None,
            })
            .unwrap();

        let update = VehicleUpdate {
            team: Some("서대구운용팀".to_string()),
            ..Default::default()
        };
        let updated = store.update(vehicle.id, &update).unwrap().unwrap();
        assert_eq!(updated.team.as_deref(), Some("서대구운용팀"));
        assert_eq!(updated.model.as_deref(), Some("포터"));

        assert!(store.remove(vehicle.id).unwrap());
        assert_eq!(store.count(), 0);
    }
}
