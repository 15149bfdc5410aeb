use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::compiler::script::html_escape;
use crate::error::Result;

/// Modules the generated script requires, in callback-argument order
pub const MODULES: [&str; 3] = ["d3", "crossfilter", "dc"];

/// Locations of the browser-side libraries the generated script drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub require_js: String,
    pub jquery: String,
    /// Module paths are given without the `.js` suffix, as the loader expects
    pub d3: String,
    pub crossfilter: String,
    pub dc: String,
    pub dc_css: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            require_js: "https://cdnjs.cloudflare.com/ajax/libs/require.js/2.1.10/require.min.js".to_string(),
            jquery: "https://cdnjs.cloudflare.com/ajax/libs/jquery/2.0.3/jquery.min.js".to_string(),
            d3: "https://cdnjs.cloudflare.com/ajax/libs/d3/3.5.16/d3.min".to_string(),
            crossfilter: "https://cdnjs.cloudflare.com/ajax/libs/crossfilter/1.3.12/crossfilter.min".to_string(),
            dc: "https://cdnjs.cloudflare.com/ajax/libs/dc/2.0.0-beta.32/dc".to_string(),
            dc_css: "https://cdnjs.cloudflare.com/ajax/libs/dc/1.7.5/dc.min.css".to_string(),
        }
    }
}

/// Result of registering the libraries with the host loader.
///
/// Emit `loader_script` and `stylesheet` once per notebook session, then pass
/// this value to every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub resources: Resources,
    pub loader_script: String,
    pub stylesheet: String,
}

pub fn bootstrap(resources: &Resources) -> Result<Bootstrap> {
    let config = json!({
        "paths": {
            "d3": resources.d3,
            "crossfilter": resources.crossfilter,
            "dc": resources.dc,
        },
        "shim": {
            "crossfilter": {
                "deps": [],
                "exports": "crossfilter",
            }
        }
    });
    let loader_script = format!("require.config({});", serde_json::to_string_pretty(&config)?);
    let stylesheet = format!(
        "<link href=\"{}\" rel=\"stylesheet\" type=\"text/css\">",
        html_escape(&resources.dc_css)
    );
    log::debug!("bootstrap registers {} modules", MODULES.len());

    Ok(Bootstrap { resources: resources.clone(), loader_script, stylesheet })
}

impl Bootstrap {
    /// `require([...], function(d3, crossfilter, dc) {` opener
    pub fn require_opener(&self) -> Result<String> {
        Ok(format!(
            "require({}, function({}) {{",
            serde_json::to_string(&MODULES)?,
            MODULES.join(", ")
        ))
    }
}
