pub mod debug_logger;
pub mod diagnostic;
pub mod proxy_health;
pub mod report_renderer;
pub mod types;

// Re-export commonly used items
pub use debug_logger::EnhancedDebugLogger;
pub use diagnostic::{DnsResolver, NetworkDiagnostic, SystemDnsResolver};
pub use report_renderer::ReportRenderer;
pub use types::*;
