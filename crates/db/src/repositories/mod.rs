//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod audit_chain_repo;
pub mod backup_repo;
pub mod dashboard_repo;
pub mod device_log_repo;
pub mod device_repo;
pub mod device_spec_repo;
pub mod inventory_permission_repo;
pub mod org_unit_repo;
pub mod ticket_comment_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use audit_chain_repo::AuditChainRepo;
pub use backup_repo::BackupRepo;
pub use dashboard_repo::DashboardRepo;
pub use device_log_repo::DeviceLogRepo;
pub use device_repo::DeviceRepo;
pub use device_spec_repo::DeviceSpecRepo;
pub use inventory_permission_repo::InventoryPermissionRepo;
pub use org_unit_repo::OrgUnitRepo;
pub use ticket_comment_repo::TicketCommentRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
