pub mod collapse;
pub mod config;
pub mod discovery;
pub mod explorer;
pub mod layout;
pub mod logging;
pub mod measure;
pub mod model;
pub mod store;
pub mod svg;

#[cfg(feature = "cli")]
pub mod cli;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use config::{Config, ConfigError};
use discovery::DiscoveryMode;
use explorer::{Explorer, ExplorerEvents};
use layout::Layout;
use store::{EvolutionStore, LoadError, UnknownRootError};
use svg::SvgRenderer;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    UnknownRoot(#[from] UnknownRootError),
    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options accepted by the browser entry points: a [`Config`] plus the
/// ids to start collapsed.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewOptions {
    #[serde(flatten)]
    pub config: Config,
    pub collapsed: Vec<String>,
}

impl ViewOptions {
    pub fn from_json(source: Option<&str>) -> Result<Self, ConfigError> {
        match source {
            Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(s)?),
            _ => Ok(Self::default()),
        }
    }
}

/// Build an explorer for `data`, focused on `root` (or the default root)
/// with the optioned entities collapsed.
pub fn explore(data: &str, root: Option<&str>, options: &ViewOptions) -> Result<Explorer, Error> {
    let store = EvolutionStore::from_json(data)?;
    let mut explorer = Explorer::new(store, &options.config);
    if let Some(root) = root {
        explorer.set_root(root)?;
    }
    for id in &options.collapsed {
        if !explorer.collapse_state().is_collapsed(id) {
            explorer.toggle_collapse(id);
        }
    }
    Ok(explorer)
}

/// Initialize logging and the panic hook in WASM
#[wasm_bindgen(start)]
pub fn init() {
    logging::init();
}

/// Lay out the evolution tree around `root` and return it as JSON
#[wasm_bindgen(js_name = "evolutionLayout")]
pub fn evolution_layout(
    data: &str,
    root: Option<String>,
    options: Option<String>,
) -> Result<String, JsValue> {
    layout_json(data, root.as_deref(), options.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render the evolution tree around `root` to SVG
#[wasm_bindgen(js_name = "evolutionToSvg")]
pub fn evolution_to_svg(
    data: &str,
    root: Option<String>,
    options: Option<String>,
) -> Result<String, JsValue> {
    render_svg(data, root.as_deref(), options.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn layout_json(data: &str, root: Option<&str>, options: Option<&str>) -> Result<String, Error> {
    let options = ViewOptions::from_json(options)?;
    let layout = explore(data, root, &options)?.layout();
    Ok(serde_json::to_string(&layout)?)
}

pub fn render_svg(data: &str, root: Option<&str>, options: Option<&str>) -> Result<String, Error> {
    let options = ViewOptions::from_json(options)?;
    let explorer = explore(data, root, &options)?;
    let layout: Layout = explorer.layout();
    Ok(SvgRenderer::new(options.config.render.clone()).render(explorer.store(), &layout))
}

struct JsCallbacks {
    toggle: Option<js_sys::Function>,
    click: Option<js_sys::Function>,
}

impl ExplorerEvents for JsCallbacks {
    fn on_toggle_collapse(&mut self, id: &str, collapsed: bool) {
        if let Some(f) = &self.toggle
            && let Err(e) = f.call2(&JsValue::NULL, &JsValue::from_str(id), &JsValue::from_bool(collapsed))
        {
            log::warn!("onToggleCollapse callback failed: {:?}", e);
        }
    }

    fn on_node_click(&mut self, id: &str) {
        if let Some(f) = &self.click
            && let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(id))
        {
            log::warn!("onNodeClick callback failed: {:?}", e);
        }
    }
}

/// Stateful view for the browser: keeps root and collapse state between
/// interactions and recomputes the layout on demand.
#[wasm_bindgen]
pub struct EvolutionView {
    explorer: Explorer,
    render: config::RenderConfig,
    toggle_cb: Option<js_sys::Function>,
    click_cb: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl EvolutionView {
    #[wasm_bindgen(constructor)]
    pub fn new(data: &str, options: Option<String>) -> Result<EvolutionView, JsValue> {
        let options =
            ViewOptions::from_json(options.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let explorer = explore(data, None, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            explorer,
            render: options.config.render,
            toggle_cb: None,
            click_cb: None,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn root(&self) -> Option<String> {
        self.explorer.root().map(str::to_string)
    }

    #[wasm_bindgen(js_name = "setRoot")]
    pub fn set_root(&mut self, id: &str) -> Result<(), JsValue> {
        self.explorer
            .set_root(id)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Switch between `"connected"` and `"lineage"` discovery.
    #[wasm_bindgen(js_name = "setDiscoveryMode")]
    pub fn set_discovery_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = DiscoveryMode::from_str(mode)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown discovery mode: {}", mode)))?;
        self.explorer.set_discovery_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = "toggleCollapse")]
    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        self.explorer.toggle_collapse(id)
    }

    #[wasm_bindgen(js_name = "expandChildrenOf")]
    pub fn expand_children_of(&mut self, id: &str) -> u32 {
        self.explorer.expand_children_of(id) as u32
    }

    #[wasm_bindgen(js_name = "nodeClick")]
    pub fn node_click(&mut self, id: &str) {
        self.explorer.node_click(id);
    }

    #[wasm_bindgen(js_name = "onToggleCollapse")]
    pub fn on_toggle_collapse(&mut self, callback: js_sys::Function) {
        self.toggle_cb = Some(callback);
        self.install_callbacks();
    }

    #[wasm_bindgen(js_name = "onNodeClick")]
    pub fn on_node_click(&mut self, callback: js_sys::Function) {
        self.click_cb = Some(callback);
        self.install_callbacks();
    }

    /// Current layout as JSON
    pub fn layout(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.explorer.layout()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "toSvg")]
    pub fn to_svg(&self) -> String {
        SvgRenderer::new(self.render.clone()).render(self.explorer.store(), &self.explorer.layout())
    }

    fn install_callbacks(&mut self) {
        self.explorer.set_listener(Box::new(JsCallbacks {
            toggle: self.toggle_cb.clone(),
            click: self.click_cb.clone(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "digimon": [
            { "name": "Koromon", "stage": "In-Training" },
            { "name": "Agumon", "stage": "Rookie" },
            { "name": "Greymon", "stage": "Champion" },
            { "name": "Meramon", "stage": "Champion" }
        ],
        "evolutions": [
            { "from": "koromon", "to": "agumon", "requirements": "Level 6" },
            { "from": "agumon", "to": "greymon", "requirements": "Attack 95+" },
            { "from": "agumon", "to": "meramon", "requirements": "Spirit 80+" }
        ]
    }"#;

    #[test]
    fn test_layout_json() {
        let json = layout_json(DATA, Some("agumon"), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(value["connections"].as_array().unwrap().len(), 3);
        assert!(value["connections"][0]["fromOffset"].is_number());
    }

    #[test]
    fn test_options_collapse_and_orientation() {
        let options = r#"{ "collapsed": ["agumon"], "layout": { "orientation": "vertical" } }"#;
        let json = layout_json(DATA, Some("agumon"), Some(options)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["connections"][0]["style"], "elbow");
    }

    #[test]
    fn test_unknown_root_error() {
        let err = layout_json(DATA, Some("gabumon"), None).unwrap_err();
        assert!(matches!(err, Error::UnknownRoot(_)));
        assert_eq!(err.to_string(), "Unknown root entity: gabumon");
    }

    #[test]
    fn test_bad_options() {
        let err = render_svg(DATA, None, Some("{ not json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_view_switches_discovery_mode() {
        let data = r#"{
            "entities": [
                { "name": "Koromon", "stage": "In-Training" },
                { "name": "Agumon", "stage": "Rookie" },
                { "name": "Gabumon", "stage": "Rookie" },
                { "name": "Greymon", "stage": "Champion" }
            ],
            "evolutions": [
                { "from": "koromon", "to": "agumon" },
                { "from": "agumon", "to": "greymon" },
                { "from": "gabumon", "to": "greymon" }
            ]
        }"#;
        let mut view = EvolutionView::new(data, None).unwrap();
        assert_eq!(view.root().as_deref(), Some("koromon"));
        let count = |view: &EvolutionView| {
            let value: serde_json::Value = serde_json::from_str(&view.layout().unwrap()).unwrap();
            value["nodes"].as_array().unwrap().len()
        };
        assert_eq!(count(&view), 4);

        view.set_discovery_mode("lineage").unwrap();
        assert_eq!(count(&view), 3);
        view.set_discovery_mode("connected").unwrap();
        assert_eq!(count(&view), 4);
    }

    #[test]
    fn test_render_svg_default_root() {
        let svg = render_svg(DATA, None, Some("")).unwrap();
        assert!(svg.contains("Koromon"));
        assert!(svg.contains("Spirit 80+"));
    }
}
