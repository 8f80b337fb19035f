//! Merging single-page label PDFs into one document.

use lopdf::{dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::PackageError;
use crate::models::label::LabelPage;

/// Concatenate label PDFs into one multi-page PDF, in the given order.
pub fn merge_labels(labels: &[LabelPage]) -> Result<Vec<u8>, PackageError> {
    if labels.is_empty() {
        return Err(PackageError::Empty);
    }

    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut max_id = merged.max_id + 1;
    let mut kids: Vec<Object> = Vec::new();

    for label in labels {
        let mut doc = Document::load_mem(label.data())
            .map_err(|e| PackageError::Merge(format!("{}: {}", label.filename(), e)))?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for page_id in doc.get_pages().into_values() {
            let page = page_with_inherited_box(&doc, page_id, pages_id)
                .map_err(|e| PackageError::Merge(format!("{}: {}", label.filename(), e)))?;
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(page_id.into());
        }

        // Pages are rebuilt above; page trees and catalogs are replaced below
        for (id, object) in doc.objects {
            let structural = matches!(
                object.type_name().unwrap_or(b""),
                b"Catalog" | b"Pages" | b"Page"
            );
            if !structural {
                merged.objects.insert(id, object);
            }
        }
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    merged.max_id = max_id;

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    merged
        .save_to(&mut out)
        .map_err(|e| PackageError::Merge(e.to_string()))?;

    debug!("Merged {} label(s) into {} pages", labels.len(), count);
    Ok(out)
}

/// Clone a page dictionary, reparent it and pin its `MediaBox`.
fn page_with_inherited_box(
    doc: &Document,
    page_id: ObjectId,
    parent: ObjectId,
) -> lopdf::Result<lopdf::Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();

    if page.get(b"MediaBox").is_err() {
        let old_parent = page.get(b"Parent")?.as_reference()?;
        let media_box = doc.get_dictionary(old_parent)?.get(b"MediaBox")?.clone();
        page.set("MediaBox", media_box);
    }
    page.set("Parent", parent);
    Ok(page)
}
