mod typst;

pub use typst::{render_pdf, typst_source};
