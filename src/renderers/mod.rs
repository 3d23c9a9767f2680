// conference-export-service/src/renderers/mod.rs

mod chrome;
mod pdf;

pub use chrome::ChromeBrowser;
pub use pdf::{BrowserSession, HeadlessBrowser, PdfRenderer, PrintJob};
