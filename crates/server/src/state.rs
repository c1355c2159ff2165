use configs::AdminConfig;
use service::listings::ListingService;
use service::uploads::UploadService;

/// Shared handles for the HTTP handlers; cheap to clone per request.
#[derive(Clone)]
pub struct ServerState {
    pub listings: ListingService,
    pub uploads: UploadService,
    pub admin: AdminConfig,
}
