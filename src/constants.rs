pub const DEFAULT_ENDPOINT: &str = "https://63c2-49-43-0-169.ngrok-free.app";

/// Tells the ngrok tunnel to skip its interstitial browser warning page.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";
pub const TUNNEL_BYPASS_VALUE: &str = "69420";

pub const DEFAULT_FIELD_NAME: &str = "image";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
pub const DICOM_CONTENT_TYPE: &str = "application/dicom";

pub const MISSING_IMAGE_MESSAGE: &str = "Please select an image first";
pub const SUBMIT_FAILED_MESSAGE: &str = "Error processing image. Please try again.";

pub const PREVIEW_URL_SCHEME: &str = "blob:tumor-scan/";
