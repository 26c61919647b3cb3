use tech_tree_router::config::{Config, parse_config};
use tech_tree_router::ir::{NodeId, Snapshot};
use tech_tree_router::layout::recompute;
use tech_tree_router::layout_dump::RoutingDump;
use tech_tree_router::measure::{GridRectProvider, NodeRectProvider};
use tech_tree_router::theme::EdgePalette;
use wasm_bindgen::prelude::*;

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn route_snapshot(
    snapshot_json: &str,
    config_json: Option<String>,
    selected_id: Option<String>,
) -> Result<String, tech_tree_router::Error> {
    let config = match config_json {
        Some(raw) => parse_config(&raw)?,
        None => Config::default(),
    };
    let mut snapshot = Snapshot::from_json(snapshot_json)?;
    let provider: Box<dyn NodeRectProvider> = match snapshot.rects.take() {
        Some(rects) => Box::new(rects),
        None => Box::new(GridRectProvider::new(&snapshot.state, &config.grid)),
    };
    let result = recompute(&snapshot.state, provider.as_ref(), &config.routing);
    let selection = selected_id.map(NodeId::new);
    RoutingDump::from_result(
        &result,
        &snapshot.state,
        selection.as_ref(),
        &EdgePalette::default(),
    )
    .to_json(false)
}

/// Routes every edge of a snapshot and returns the routing dump as JSON.
#[wasm_bindgen]
pub fn recompute_routes(snapshot_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    route_snapshot(snapshot_json, config_json, None).map_err(to_js)
}

/// Same as `recompute_routes`, with the lineage of `selected_id` highlighted.
#[wasm_bindgen]
pub fn recompute_routes_with_selection(
    snapshot_json: &str,
    config_json: Option<String>,
    selected_id: String,
) -> Result<String, JsValue> {
    route_snapshot(snapshot_json, config_json, Some(selected_id)).map_err(to_js)
}

#[cfg(test)]
mod tests {
    use crate::route_snapshot;

    const SNAPSHOT: &str = r##"{
        "state": {
            "nodes": [
                { "id": "a", "tierId": "tier-0", "columnIndex": 0, "groupId": "g" },
                { "id": "b", "tierId": "tier-1", "columnIndex": 0, "parentIds": ["a"] }
            ],
            "groups": [{ "id": "g", "color": "#38bdf8" }]
        }
    }"##;

    #[test]
    fn routes_snapshot_on_synthetic_grid() {
        let json = route_snapshot(SNAPSHOT, None, None).expect("snapshot should route");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["routedPaths"][0]["id"], "a-b");
        assert_eq!(value["routedPaths"][0]["isBlocked"], false);
        assert_eq!(value["needsRetry"], false);
    }

    #[test]
    fn selection_and_config_are_applied() {
        let config = r#"{ "grid": { "tierSpan": 400 } }"#.to_string();
        let json = route_snapshot(SNAPSHOT, Some(config), Some("b".to_string())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["routedPaths"][0]["stroke"]["color"], "#38bdf8");
        // b sits one 400px tier below a: top = 400 + (400 - 120) / 2
        assert_eq!(value["routedPaths"][0]["points"][3][1], 540.0);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(route_snapshot("{", None, None).is_err());
    }
}
