//! Google Analytics API clients.

pub mod management;
pub mod reporting;

// Re-export commonly used types
pub use management::{
    Account, CustomDataSource, ManagementApi, ManagementService, Profile, Upload, UploadStatus,
    UploadsApi, WebProperty,
};
pub use reporting::{ReportingService, ReportsApi};
