//! Asset loading/parsers (meshes, textures).
//! OBJ mesh loader producing CPU-friendly polygonal mesh data, plus an
//! ASCII PPM (`P3`) image loader for the scene textures.

pub mod mesh;
pub mod obj;
pub mod ppm;
pub mod texture;

pub use mesh::{MeshFace, MeshFacePoint, MeshObject};
pub use obj::MeshError;
pub use ppm::PpmError;
pub use texture::{TextureData, TextureFormat};
