#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("Employee cannot be their own manager")]
    SelfManagement,

    #[error("Manager not found: {0}")]
    UnknownManager(String),

    #[error("Manager assignment would create a reporting cycle through {0}")]
    ManagerCycle(String),
}

pub type Result<T> = std::result::Result<T, HierarchyError>;
