pub mod error;
pub mod config;

pub mod employee;
pub mod pagination;
pub mod service;
pub mod store;
pub mod view;

pub use crate::config::{load_or_create_directory_config, DirectoryConfig};
pub use crate::employee::{Employee, EmployeeDetail, EmployeeListing, EmployeePatch, NewEmployee};
pub use crate::error::{DirectoryError, DirectoryResult};
pub use crate::pagination::{Page, PageRequest};
pub use crate::service::Directory;
pub use crate::store::{EmployeeStore, FileEmployeeStore, MemoryEmployeeStore};
pub use crate::view::{DirectoryView, FetchTicket, ViewRow};
