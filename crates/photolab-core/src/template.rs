use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;

/// Render a template file from `dir` with the given context.
///
/// The context is anything serializable (structs, maps).
pub fn render_from_dir<S: Serialize>(dir: &Path, template: &str, context: S) -> Result<String> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(dir));
    let tmpl = env.get_template(template)?;
    Ok(tmpl.render(context)?)
}
