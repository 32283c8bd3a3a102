//! In-memory employee store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::employee::Employee;
use crate::error::DirectoryResult;
use crate::store::EmployeeStore;

#[derive(Debug, Default)]
pub struct MemoryEmployeeStore {
    employees: Mutex<Vec<Employee>>,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
        }
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn load(&self) -> DirectoryResult<Vec<Employee>> {
        Ok(self.employees.lock().await.clone())
    }

    async fn save(&self, employees: &[Employee]) -> DirectoryResult<()> {
        *self.employees.lock().await = employees.to_vec();
        Ok(())
    }
}
