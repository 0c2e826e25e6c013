/// Fatal GPU setup failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    AdapterNotFound,
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("{label} failed validation: {message}")]
    Validation { label: String, message: String },
    #[error("built-in shader: {0}")]
    BuiltinShader(#[from] orbitview_assets::AssetError),
}
