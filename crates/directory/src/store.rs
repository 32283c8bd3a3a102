pub mod file;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::employee::Employee;
use crate::error::DirectoryResult;

pub use file::FileEmployeeStore;
pub use memory::MemoryEmployeeStore;

/// Persistence seam for the employee directory.
///
/// The directory keeps the working set in memory and hands the whole list
/// back to the store after every mutation.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn load(&self) -> DirectoryResult<Vec<Employee>>;
    async fn save(&self, employees: &[Employee]) -> DirectoryResult<()>;
}

pub type SharedEmployeeStore = Arc<dyn EmployeeStore>;
