use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use winops_protocol::DhcpLease;

/// Records that can receive a cosmetic annotation from a side query.
pub trait Annotate {
    /// Exact-match key into the annotation map.
    fn annotation_key(&self) -> &str;

    fn annotate(&mut self, value: &str);
}

impl Annotate for DhcpLease {
    fn annotation_key(&self) -> &str {
        &self.address
    }

    fn annotate(&mut self, value: &str) {
        self.comment = value.to_string();
    }
}

/// Runs one query per scope plus one annotation query, all concurrently,
/// and merges the results.
///
/// Output order is scope order, then record order within a scope, no
/// matter which task finishes first: every scope owns a slot reserved
/// before its task is spawned. A failed scope leaves its slot empty and a
/// failed annotation query leaves every record unannotated; neither aborts
/// the rest. With no scopes nothing is spawned and the annotation future
/// is never polled.
///
/// There is no timeout: a hung query hangs the whole call.
pub async fn aggregate<S, R, E, F, Fut, A, AE>(scopes: Vec<S>, fetch: F, annotations: A) -> Vec<R>
where
    S: Display,
    R: Annotate + Send + 'static,
    E: Display + Send + 'static,
    F: Fn(&S) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>> + Send + 'static,
    A: Future<Output = Result<HashMap<String, String>, AE>> + Send + 'static,
    AE: Display + Send + 'static,
{
    if scopes.is_empty() {
        return Vec::new();
    }

    let annotation_task = tokio::spawn(annotations);

    let mut slots: Vec<Vec<R>> = Vec::with_capacity(scopes.len());
    slots.resize_with(scopes.len(), Vec::new);
    let tasks: Vec<_> = scopes
        .iter()
        .map(|scope| tokio::spawn(fetch(scope)))
        .collect();

    for ((slot, task), scope) in slots.iter_mut().zip(tasks).zip(&scopes) {
        match task.await {
            Ok(Ok(records)) => *slot = records,
            Ok(Err(err)) => log::warn!("scope {scope}: query failed, leaving it empty: {err}"),
            Err(err) => log::warn!("scope {scope}: task did not complete: {err}"),
        }
    }

    let comments = match annotation_task.await {
        Ok(Ok(map)) => map,
        Ok(Err(err)) => {
            log::warn!("annotation query failed, records stay unannotated: {err}");
            HashMap::new()
        }
        Err(err) => {
            log::warn!("annotation task did not complete: {err}");
            HashMap::new()
        }
    };

    let mut records: Vec<R> = slots.into_iter().flatten().collect();
    apply_annotations(&mut records, &comments);
    records
}

/// Applies `annotations` by exact key; records without a match keep their value.
pub fn apply_annotations<R: Annotate>(records: &mut [R], annotations: &HashMap<String, String>) {
    if annotations.is_empty() {
        return;
    }
    for record in records {
        if let Some(value) = annotations.get(record.annotation_key()) {
            record.annotate(value);
        }
    }
}
