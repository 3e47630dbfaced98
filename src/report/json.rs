//! Asynchronous tree-to-JSON serialization.
//!
//! Each node's JSON object is a future: screenshot resolution and child
//! serialization fan out concurrently and both must finish before the
//! node's value exists. The first failure propagates through the joins
//! to the caller; there is no cancellation or retry path.

use futures::future::{self, BoxFuture, try_join_all};
use serde_json::{Map, Value, json};

use crate::report::node::{ScenarioTree, StepTree};
use crate::report::story::UserStory;
use crate::report::types::ReportResult;
use crate::screenshot::ScreenshotCapture;
use crate::trace::TestError;

/// Serialize one scenario report, recursing into its steps
pub async fn scenario_to_json(tree: ScenarioTree) -> ReportResult<Value> {
    let story = UserStory::from_scenario(&tree.scenario);
    let steps = try_join_all(tree.steps.into_iter().map(step_to_json)).await?;

    let mut object = Map::new();
    object.insert("name".into(), json!(tree.scenario.name.clone()));
    object.insert("title".into(), json!(tree.scenario.name));
    // Placeholders kept for downstream report consumers
    object.insert("description".into(), json!(""));
    object.insert("tags".into(), json!([]));
    object.insert("startTime".into(), json!(tree.started_at));
    object.insert("manual".into(), json!(false));
    if let Some(duration) = tree.duration {
        object.insert("duration".into(), json!(duration));
    }
    if let Some(result) = tree.result {
        object.insert("result".into(), json!(result.as_str()));
    }
    object.insert("testSteps".into(), Value::Array(steps));
    object.insert("userStory".into(), serde_json::to_value(&story)?);
    if let Some(error) = &tree.error {
        object.insert("testFailureCause".into(), error_to_json(error)?);
    }
    Ok(Value::Object(object))
}

/// Serialize one step report. Boxed because steps recurse.
fn step_to_json(tree: StepTree) -> BoxFuture<'static, ReportResult<Value>> {
    Box::pin(async move {
        let (screenshots, children) = future::try_join(
            resolve_screenshots(tree.screenshots),
            try_join_all(tree.children.into_iter().map(step_to_json)),
        )
        .await?;

        let mut object = Map::new();
        object.insert("description".into(), json!(tree.description));
        object.insert("startTime".into(), json!(tree.started_at));
        if let Some(duration) = tree.duration {
            object.insert("duration".into(), json!(duration));
        }
        if let Some(result) = tree.result {
            object.insert("result".into(), json!(result.as_str()));
        }
        object.insert("children".into(), Value::Array(children));
        if let Some(error) = &tree.error {
            object.insert("exception".into(), error_to_json(error)?);
        }
        insert_if_nonempty(&mut object, "screenshots", screenshots);
        Ok(Value::Object(object))
    })
}

/// Await every pending capture, keeping attachment order
async fn resolve_screenshots(captures: Vec<ScreenshotCapture>) -> ReportResult<Vec<Value>> {
    let screenshots = try_join_all(captures).await?;
    Ok(screenshots
        .iter()
        .map(|shot| json!({ "screenshot": shot.file_name() }))
        .collect())
}

/// The report error object; `stackTrace` is omitted when the error
/// carries no frames
fn error_to_json(error: &TestError) -> ReportResult<Value> {
    Ok(serde_json::to_value(error)?)
}

/// Optional collections are omitted from the report rather than
/// serialized as empty arrays
fn insert_if_nonempty(object: &mut Map<String, Value>, key: &str, values: Vec<Value>) {
    if !values.is_empty() {
        object.insert(key.into(), Value::Array(values));
    }
}
