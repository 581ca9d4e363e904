pub mod upload;
pub use upload::{PendingFile, PendingUploads, UploadError, UploadSlot, UploadStore};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod case_service;
pub mod case_service_impl;
pub use case_service::{CaseError, CaseForm, CaseService};
pub use case_service_impl::SeaOrmCaseService;

pub mod proceeding_service;
pub mod proceeding_service_impl;
pub use proceeding_service::{ProceedingError, ProceedingService};
pub use proceeding_service_impl::SeaOrmProceedingService;
