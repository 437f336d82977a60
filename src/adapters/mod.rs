// Adapters layer: concrete implementations for external systems (OCR engines, storage).

pub mod recognizer;
pub mod storage;

pub use recognizer::{build_recognizer, HttpRecognizer, TesseractRecognizer, TextRecognizer};
pub use storage::LocalStorage;
