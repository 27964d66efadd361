//! Shader loading with up-front WGSL validation.
//!
//! Sources are parsed and validated with naga before they reach the device, so
//! a broken shader surfaces as a [`ShaderError`] carrying the diagnostic text
//! instead of a device-level panic. After compilation the vertex/fragment
//! interface is checked the way a program link step would.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use naga::{Binding, Module, ShaderStage, TypeInner};
use thiserror::Error;

/// Entry point names every pipeline shader must provide.
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Error types for shader loading operations.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// The WGSL failed to parse or validate.
    #[error("shader '{name}' failed to compile:\n{message}")]
    CompilationFailed { name: String, message: String },

    /// The stages compiled but do not fit together.
    #[error("shader '{name}' failed to link: {message}")]
    LinkFailed { name: String, message: String },

    #[error("shader file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no shader directory configured for file-based loading")]
    NoShaderDir,
}

/// Parse and validate WGSL, returning the naga module.
pub fn compile_wgsl(name: &str, source: &str) -> Result<Module, ShaderError> {
    let module =
        naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::CompilationFailed {
            name: name.to_string(),
            message: e.emit_to_string(source),
        })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| ShaderError::CompilationFailed {
            name: name.to_string(),
            message: e.as_inner().to_string(),
        })?;

    Ok(module)
}

/// Check that `module` has both pipeline entry points, that the vertex stage
/// only reads `vertex_locations`, and that every fragment input location is
/// written by the vertex stage.
pub fn link_check(name: &str, module: &Module, vertex_locations: &[u32]) -> Result<(), ShaderError> {
    let link_error = |message: String| ShaderError::LinkFailed {
        name: name.to_string(),
        message,
    };

    let find = |stage: ShaderStage, entry: &str| {
        module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage && ep.name == entry)
            .ok_or_else(|| link_error(format!("missing {stage:?} entry point '{entry}'")))
    };
    let vertex = find(ShaderStage::Vertex, VERTEX_ENTRY)?;
    let fragment = find(ShaderStage::Fragment, FRAGMENT_ENTRY)?;

    let vertex_inputs = argument_locations(module, &vertex.function);
    if let Some(missing) = vertex_inputs
        .iter()
        .find(|loc| !vertex_locations.contains(loc))
    {
        return Err(link_error(format!(
            "vertex input @location({missing}) has no matching vertex attribute"
        )));
    }

    let vertex_outputs = vertex
        .function
        .result
        .as_ref()
        .map(|result| binding_locations(module, result.ty, result.binding.as_ref()))
        .unwrap_or_default();
    let fragment_inputs = argument_locations(module, &fragment.function);
    if let Some(missing) = fragment_inputs.difference(&vertex_outputs).next() {
        return Err(link_error(format!(
            "fragment input @location({missing}) is not written by '{VERTEX_ENTRY}'"
        )));
    }

    Ok(())
}

fn argument_locations(module: &Module, function: &naga::Function) -> BTreeSet<u32> {
    function
        .arguments
        .iter()
        .flat_map(|arg| binding_locations(module, arg.ty, arg.binding.as_ref()))
        .collect()
}

/// Locations of a value that is either directly bound or a struct of bound members.
fn binding_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
) -> BTreeSet<u32> {
    match binding {
        Some(Binding::Location { location, .. }) => BTreeSet::from([*location]),
        Some(Binding::BuiltIn(_)) => BTreeSet::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match m.binding {
                    Some(Binding::Location { location, .. }) => Some(location),
                    _ => None,
                })
                .collect(),
            _ => BTreeSet::new(),
        },
    }
}

/// Registry of compiled shader modules keyed by name.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
    shader_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            shader_dir: None,
        }
    }

    /// Directory to load `.wgsl` files from.
    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    pub fn shader_dir(&self) -> Option<&PathBuf> {
        self.shader_dir.as_ref()
    }

    /// Compile, link-check and register a pipeline shader from WGSL source.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
        vertex_locations: &[u32],
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        debug!("Compiling shader '{}'", name);

        let naga_module = compile_wgsl(name, source)?;
        link_check(name, &naga_module, vertex_locations)?;

        let module = Arc::new(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        }));

        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }
        Ok(module)
    }

    /// Load `<shader_dir>/<name>.wgsl`.
    pub fn load_from_file(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        vertex_locations: &[u32],
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let shader_dir = self.shader_dir.as_ref().ok_or(ShaderError::NoShaderDir)?;
        let path = shader_dir.join(format!("{name}.wgsl"));
        if !path.exists() {
            return Err(ShaderError::FileNotFound { path });
        }

        debug!("Reading shader '{}' from {}", name, path.display());
        let source = std::fs::read_to_string(&path)?;
        self.load_from_source(device, name, &source, vertex_locations)
    }

    /// Load from the shader directory when one is set, otherwise from `embedded`.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        embedded: &str,
        vertex_locations: &[u32],
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        if self.shader_dir.is_some() {
            self.load_from_file(device, name, vertex_locations)
        } else {
            self.load_from_source(device, name, embedded, vertex_locations)
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<wgpu::ShaderModule>> {
        self.modules.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body_pipeline::BODY_SHADER_SOURCE;

    const POSITION_UV: &[u32] = &[0, 1];

    const MISSING_FRAGMENT: &str = r#"
        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }
    "#;

    const MISMATCHED_VARYING: &str = r#"
        struct VsOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) uv: vec2<f32>,
        };

        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> VsOut {
            var out: VsOut;
            out.clip = vec4<f32>(position, 1.0);
            out.uv = vec2<f32>(0.0, 0.0);
            return out;
        }

        @fragment
        fn fs_main(@location(3) shade: vec4<f32>) -> @location(0) vec4<f32> {
            return shade;
        }
    "#;

    #[test]
    fn test_body_shader_compiles_and_links() {
        let module = compile_wgsl("orrery", BODY_SHADER_SOURCE).unwrap();
        link_check("orrery", &module, POSITION_UV).unwrap();
    }

    #[test]
    fn test_syntax_error_is_compilation_failure() {
        let err = compile_wgsl("broken", "fn vs_main( {").unwrap_err();
        match err {
            ShaderError::CompilationFailed { name, message } => {
                assert_eq!(name, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("expected compilation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_identifier_is_compilation_failure() {
        let source = r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return undeclared_variable;
            }
        "#;
        assert!(matches!(
            compile_wgsl("undeclared", source),
            Err(ShaderError::CompilationFailed { .. })
        ));
    }

    #[test]
    fn test_missing_fragment_entry_fails_link() {
        let module = compile_wgsl("vs-only", MISSING_FRAGMENT).unwrap();
        let err = link_check("vs-only", &module, POSITION_UV).unwrap_err();
        assert!(matches!(err, ShaderError::LinkFailed { .. }));
        assert!(err.to_string().contains(FRAGMENT_ENTRY));
    }

    #[test]
    fn test_unwritten_varying_fails_link() {
        let module = compile_wgsl("varying", MISMATCHED_VARYING).unwrap();
        let err = link_check("varying", &module, POSITION_UV).unwrap_err();
        assert!(err.to_string().contains("@location(3)"));
    }

    #[test]
    fn test_vertex_input_without_attribute_fails_link() {
        let module = compile_wgsl("orrery", BODY_SHADER_SOURCE).unwrap();
        let err = link_check("orrery", &module, &[0]).unwrap_err();
        assert!(matches!(err, ShaderError::LinkFailed { .. }));
    }

    #[test]
    fn test_library_starts_empty() {
        let library = ShaderLibrary::new().with_shader_dir("shaders");
        assert!(library.is_empty());
        assert!(library.get("orrery").is_none());
        assert_eq!(library.shader_dir(), Some(&PathBuf::from("shaders")));
    }
}
