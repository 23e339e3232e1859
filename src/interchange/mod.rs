//! Model interchange: Ecore XMI export.

mod xmi;

pub use xmi::{export_model, namespace, write_xmi, XmiWriter};
