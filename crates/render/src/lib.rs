mod camera;
mod scene;
mod viewport;

pub use camera::{CameraMove, FlyCamera, ViewportProjection, FAR_PLANE, NEAR_PLANE};
pub use scene::{RenderAttribute, RenderMesh, RenderObject, RenderScene, RenderTexture, TextureWrap};
pub use viewport::{FrameParams, LightParams, PhongParams, ViewportRenderer, ViewportStats};
