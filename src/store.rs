use crate::model::{CompanyInfo, InspectorRecord, JobData, MasterData};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

pub const JOBS: &str = "jobs";
pub const INSPECTORS: &str = "inspectors";
pub const COMPANY: &str = "company";

/// Read-only document store over a directory tree: one subdirectory per
/// collection, one `<id>.json` file per document.
pub struct FileStore {
    root: PathBuf,
}

/// Listing knobs applied after decode: a single equality filter on one
/// top-level field, an optional field sort, and a result cap.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub order_by: Option<String>,
    pub ascending: bool,
    pub filter_eq: Option<(String, String)>,
    pub limit: Option<usize>,
}

impl FileStore {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("store root not found: {}", root.display());
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// One document by id, `None` when absent. A file that exists but does
    /// not decode is an error, not a miss.
    pub fn document<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        // Ids name files inside the collection, never paths.
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            anyhow::bail!("invalid document id: {id}");
        }
        let path = self.root.join(collection).join(format!("{id}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading document: {}", path.display()))?;
        let doc = serde_json::from_str(&raw)
            .with_context(|| format!("decoding document: {}", path.display()))?;
        Ok(Some(doc))
    }

    /// All documents of a collection as `(id, value)` pairs. A missing
    /// collection directory lists as empty. Results are id-sorted before
    /// the optional field sort so output order never depends on the
    /// directory iteration order.
    pub fn documents<T: DeserializeOwned>(
        &self,
        collection: &str,
        opts: &ListOptions,
    ) -> Result<Vec<(String, T)>> {
        let dir = self.root.join(collection);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut raw_docs: Vec<(String, Value)> = Vec::new();
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("listing collection: {}", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("listing collection: {}", dir.display()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading document: {}", path.display()))?;
            let value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("decoding document: {}", path.display()))?;
            raw_docs.push((id, value));
        }

        raw_docs.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some((field, wanted)) = &opts.filter_eq {
            raw_docs.retain(|(_, v)| field_text(v, field).as_deref() == Some(wanted.as_str()));
        }
        if let Some(field) = &opts.order_by {
            raw_docs.sort_by(|a, b| {
                let ord = compare_fields(&a.1, &b.1, field);
                if opts.ascending { ord } else { ord.reverse() }
            });
        }
        if let Some(limit) = opts.limit {
            raw_docs.truncate(limit);
        }

        let mut docs = Vec::with_capacity(raw_docs.len());
        for (id, value) in raw_docs {
            let doc: T = serde_json::from_value(value)
                .with_context(|| format!("decoding document {id} in {collection}"))?;
            docs.push((id, doc));
        }
        Ok(docs)
    }

    pub fn job(&self, id: &str) -> Result<Option<JobData>> {
        self.document(JOBS, id)
    }

    /// Inspector roster plus the company record. The company collection is
    /// expected to hold one document; extras are ignored in id order.
    pub fn master_data(&self) -> Result<MasterData> {
        let opts = ListOptions {
            order_by: Some("name".into()),
            ascending: true,
            ..ListOptions::default()
        };
        let inspectors: Vec<InspectorRecord> = self
            .documents(INSPECTORS, &opts)?
            .into_iter()
            .map(|(_, rec)| rec)
            .collect();

        let company: Option<CompanyInfo> = self
            .documents(
                COMPANY,
                &ListOptions {
                    limit: Some(1),
                    ..ListOptions::default()
                },
            )?
            .into_iter()
            .next()
            .map(|(_, c)| c);

        Ok(MasterData {
            inspectors,
            company,
        })
    }
}

fn field_text(value: &Value, field: &str) -> Option<String> {
    match value.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Missing fields sort first; numbers compare numerically, everything else
/// by string form.
fn compare_fields(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(av), Some(bv)) => match (av.as_f64(), bv.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => field_text(a, field).cmp(&field_text(b, field)),
        },
    }
}
