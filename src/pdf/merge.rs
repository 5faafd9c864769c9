//! Painting one document's page on top of a page in another document.
//!
//! The foreign page is wrapped in a Form XObject so its resource names can
//! never collide with the names used by the page underneath.

use anyhow::{anyhow, bail, Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

/// Guards against `Parent` cycles in malformed page trees.
const MAX_TREE_DEPTH: usize = 64;

const XOBJECT_PREFIX: &str = "PageStamp";

/// Composite the first page of `overlay` over `page_id` in `target`.
///
/// The target page keeps its MediaBox and all existing content; the overlay
/// is painted last.
pub fn merge_page(target: &mut Document, page_id: ObjectId, overlay: &Document) -> Result<()> {
    let overlay_page = overlay
        .get_pages()
        .into_values()
        .next()
        .ok_or_else(|| anyhow!("Overlay document has no pages"))?;

    let form_id = import_page_as_form(target, overlay, overlay_page)?;

    let mut resources = match inherited_attribute(target, page_id, b"Resources")? {
        Some(object) => resolve(target, object)?.as_dict()?.clone(),
        None => Dictionary::new(),
    };
    let mut xobjects = match resources.get(b"XObject") {
        Ok(object) => resolve(target, object)?.as_dict()?.clone(),
        Err(_) => Dictionary::new(),
    };

    let name = unused_name(&xobjects);
    xobjects.set(name.clone(), Object::Reference(form_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut contents = existing_contents(target, page_id)?;
    // Streams are concatenated byte for byte, so both edges need whitespace.
    let save_id = target.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let paint_id = target.add_object(Stream::new(
        Dictionary::new(),
        format!("\nQ\nq\n/{} Do\nQ\n", name).into_bytes(),
    ));
    contents.insert(0, Object::Reference(save_id));
    contents.push(Object::Reference(paint_id));

    let page = target
        .get_dictionary_mut(page_id)
        .context("Target page is not a dictionary")?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));

    Ok(())
}

/// Copy a page's content and resources into `target` as a Form XObject.
fn import_page_as_form(target: &mut Document, source: &Document, page_id: ObjectId) -> Result<ObjectId> {
    let content = source
        .get_page_content(page_id)
        .context("Failed to read overlay page content")?;

    let bbox = match inherited_attribute(source, page_id, b"MediaBox")? {
        Some(object) => resolve(source, object)?.clone(),
        None => bail!("Overlay page has no MediaBox"),
    };

    let mut imported = BTreeMap::new();
    let resources = match inherited_attribute(source, page_id, b"Resources")? {
        Some(object) => import_object(target, source, object, &mut imported)?,
        None => Object::Dictionary(Dictionary::new()),
    };

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Form".to_vec())),
        ("BBox", bbox),
        ("Resources", resources),
    ]);
    Ok(target.add_object(Stream::new(dict, content)))
}

/// Deep-copy `object` from `source` into `target`, remapping references.
///
/// `imported` maps source ids to target ids so shared objects are copied
/// once and reference cycles terminate.
fn import_object(
    target: &mut Document,
    source: &Document,
    object: &Object,
    imported: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Object> {
    Ok(match object {
        Object::Reference(id) => Object::Reference(import_reference(target, source, *id, imported)?),
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| import_object(target, source, item, imported))
                .collect::<Result<_>>()?,
        ),
        Object::Dictionary(dict) => {
            Object::Dictionary(import_dictionary(target, source, dict, imported)?)
        }
        Object::Stream(stream) => {
            let mut copy = stream.clone();
            copy.dict = import_dictionary(target, source, &stream.dict, imported)?;
            Object::Stream(copy)
        }
        other => other.clone(),
    })
}

fn import_dictionary(
    target: &mut Document,
    source: &Document,
    dict: &Dictionary,
    imported: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut copy = Dictionary::new();
    for (key, value) in dict.iter() {
        copy.set(key.clone(), import_object(target, source, value, imported)?);
    }
    Ok(copy)
}

fn import_reference(
    target: &mut Document,
    source: &Document,
    id: ObjectId,
    imported: &mut BTreeMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    if let Some(new_id) = imported.get(&id) {
        return Ok(*new_id);
    }

    let new_id = target.new_object_id();
    imported.insert(id, new_id);

    let object = source
        .get_object(id)
        .with_context(|| format!("Dangling reference {} {} R in overlay", id.0, id.1))?;
    let copy = import_object(target, source, object, imported)?;
    target.objects.insert(new_id, copy);
    Ok(new_id)
}

/// Look up an inheritable page attribute, walking up through `Parent`.
fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }
    bail!("Page tree is deeper than {} levels", MAX_TREE_DEPTH)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// The page's content streams as a flat list of references.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(items) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

fn unused_name(xobjects: &Dictionary) -> String {
    let mut name = XOBJECT_PREFIX.to_string();
    let mut suffix = 1;
    while xobjects.has(name.as_bytes()) {
        name = format!("{}{}", XOBJECT_PREFIX, suffix);
        suffix += 1;
    }
    name
}
