//! Reading `explain` output.
//!
//! The server reports a query plan as a tree of stages. Classic plans nest
//! children under `inputStage`/`inputStages`; plans from the slot-based engine
//! wrap the tree in `queryPlan`. [`plan_stages`] flattens either shape.

use std::fmt;

use mongodb::bson::{Bson, Document};

/// The `queryPlanner.winningPlan` section of an explain result, or the whole
/// result when that section is missing.
pub fn winning_plan(explain: &Document) -> Document {
    explain
        .get_document("queryPlanner")
        .and_then(|planner| planner.get_document("winningPlan"))
        .cloned()
        .unwrap_or_else(|_| explain.clone())
}

/// Stage names in depth-first order, root first.
pub fn plan_stages(plan: &Document) -> Vec<String> {
    let mut stages = Vec::new();
    collect_stages(plan, &mut stages);
    stages
}

fn collect_stages(node: &Document, stages: &mut Vec<String>) {
    if let Ok(stage) = node.get_str("stage") {
        stages.push(stage.to_string());
    }
    for key in ["queryPlan", "inputStage"] {
        if let Ok(child) = node.get_document(key) {
            collect_stages(child, stages);
        }
    }
    if let Ok(children) = node.get_array("inputStages") {
        for child in children.iter().filter_map(Bson::as_document) {
            collect_stages(child, stages);
        }
    }
}

/// How a query plan reaches its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// Reads every document (`COLLSCAN`).
    CollectionScan,
    /// Walks an index (`IXSCAN`, `EXPRESS_IXSCAN`, `IDHACK`, ...).
    IndexScan,
    Other,
}

impl PlanKind {
    pub fn classify(plan: &Document) -> Self {
        let stages = plan_stages(plan);
        if stages.iter().any(|s| s == "COLLSCAN") {
            PlanKind::CollectionScan
        } else if stages
            .iter()
            .any(|s| s.contains("IXSCAN") || s == "IDHACK")
        {
            PlanKind::IndexScan
        } else {
            PlanKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::CollectionScan => "collection scan",
            PlanKind::IndexScan => "index scan",
            PlanKind::Other => "other",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pretty JSON rendering of a plan (relaxed extended JSON).
pub fn to_pretty_json(plan: &Document) -> String {
    let value = Bson::Document(plan.clone()).into_relaxed_extjson();
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| plan.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn explain_with(plan: Document) -> Document {
        doc! {
            "queryPlanner": {
                "namespace": "plp_bookstore.books",
                "winningPlan": plan,
                "rejectedPlans": [],
            },
            "executionStats": { "nReturned": 1 },
        }
    }

    #[test]
    fn test_collection_scan() {
        let explain = explain_with(doc! {
            "stage": "COLLSCAN",
            "filter": { "title": { "$eq": "Dune" } },
            "direction": "forward",
        });
        let plan = winning_plan(&explain);
        assert_eq!(plan_stages(&plan), vec!["COLLSCAN"]);
        assert_eq!(PlanKind::classify(&plan), PlanKind::CollectionScan);
    }

    #[test]
    fn test_index_scan_under_fetch() {
        let plan = winning_plan(&explain_with(doc! {
            "stage": "FETCH",
            "inputStage": {
                "stage": "IXSCAN",
                "keyPattern": { "title": 1 },
                "indexName": "title_idx",
            },
        }));
        assert_eq!(plan_stages(&plan), vec!["FETCH", "IXSCAN"]);
        assert_eq!(PlanKind::classify(&plan), PlanKind::IndexScan);
    }

    #[test]
    fn test_slot_based_plan() {
        let plan = winning_plan(&explain_with(doc! {
            "queryPlan": {
                "stage": "FETCH",
                "inputStage": { "stage": "IXSCAN", "indexName": "title_idx" },
            },
            "slotBasedPlan": { "stages": "..." },
        }));
        assert_eq!(PlanKind::classify(&plan), PlanKind::IndexScan);
    }

    #[test]
    fn test_express_and_or_plans() {
        let express = doc! { "stage": "EXPRESS_IXSCAN", "keyPattern": "{ title: 1 }" };
        assert_eq!(PlanKind::classify(&express), PlanKind::IndexScan);

        let or = doc! {
            "stage": "OR",
            "inputStages": [
                { "stage": "IXSCAN" },
                { "stage": "COLLSCAN" },
            ],
        };
        assert_eq!(plan_stages(&or), vec!["OR", "IXSCAN", "COLLSCAN"]);
        assert_eq!(PlanKind::classify(&or), PlanKind::CollectionScan);
    }

    #[test]
    fn test_missing_planner_falls_back() {
        let raw = doc! { "ok": 1.0 };
        assert_eq!(winning_plan(&raw), raw);
        assert_eq!(PlanKind::classify(&raw), PlanKind::Other);
    }

    #[test]
    fn test_pretty_json() {
        let json = to_pretty_json(&doc! { "stage": "COLLSCAN", "direction": "forward" });
        assert!(json.contains("\"stage\": \"COLLSCAN\""));
        assert!(json.contains('\n'));
    }
}
