pub mod compare_faces;

pub use compare_faces::{CompareFaces, CompareFacesError, CompareFacesInput, CompareFacesOutput};
