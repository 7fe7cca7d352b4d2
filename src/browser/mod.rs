//! Browser automation: the WebDriver server, the session, and page access.

pub mod driver;
pub mod page;
pub mod session;

pub use driver::DriverService;
pub use page::{load, Page, StaticPage};
pub use session::BrowserSession;
