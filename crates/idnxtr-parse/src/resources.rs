//! Page resources resolved into owned data.
//!
//! Fonts and Form XObjects are looked up in the document once per page, so a
//! [`PageContent`] can be turned into text later without the document, on
//! any thread.

use std::collections::HashMap;
use std::sync::Arc;

use crate::font::FontDecoder;
use crate::lopdf_backend::{resolve, stream_bytes};

/// `/Parent` hops followed when looking for inherited `/Resources`.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Identifies a Form XObject within a document.
pub type FormId = lopdf::ObjectId;

/// Named fonts and Form XObjects of one resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    fonts: HashMap<String, Arc<FontDecoder>>,
    forms: HashMap<String, FormId>,
}

impl PageResources {
    /// Decoder of the font named by `Tf`.
    pub fn font(&self, name: &str) -> Option<&Arc<FontDecoder>> {
        self.fonts.get(name)
    }

    /// Form XObject named by `Do`.
    pub fn form(&self, name: &str) -> Option<FormId> {
        self.forms.get(name).copied()
    }

    pub fn with_font(mut self, name: impl Into<String>, decoder: FontDecoder) -> Self {
        self.fonts.insert(name.into(), Arc::new(decoder));
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, id: FormId) -> Self {
        self.forms.insert(name.into(), id);
        self
    }
}

/// A Form XObject: its content, `/Matrix` and resources.
#[derive(Debug, Clone)]
pub struct FormXObject {
    pub content: Vec<u8>,
    pub matrix: [f64; 6],
    pub resources: PageResources,
}

/// Content stream bytes of a page together with everything its text
/// operators refer to.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Decoded content stream bytes.
    pub content: Vec<u8>,
    /// Page-level resources.
    pub resources: PageResources,
    forms: HashMap<FormId, FormXObject>,
}

impl PageContent {
    /// Content without resources: strings decode as WinAnsi or UTF-16BE.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_resources(mut self, resources: PageResources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_form_xobject(mut self, id: FormId, form: FormXObject) -> Self {
        self.forms.insert(id, form);
        self
    }

    pub fn form(&self, id: FormId) -> Option<&FormXObject> {
        self.forms.get(&id)
    }

    /// Resolve the resources of `page` (inheriting through `/Parent`) and
    /// every Form XObject reachable from them.
    pub(crate) fn load(
        doc: &lopdf::Document,
        page: &lopdf::Dictionary,
        content: Vec<u8>,
    ) -> Self {
        let mut resolver = Resolver {
            doc,
            fonts: HashMap::new(),
            pending: Vec::new(),
        };
        let resources = resolver.resources(inherited_resources(doc, page));

        let mut forms = HashMap::new();
        while let Some((id, parent)) = resolver.pending.pop() {
            if forms.contains_key(&id) {
                continue;
            }
            let Ok(lopdf::Object::Stream(stream)) = doc.get_object(id) else {
                continue;
            };
            let own = match stream.dict.get(b"Resources").map(|o| resolve(doc, o)) {
                Ok(lopdf::Object::Dictionary(dict)) => resolver.resources(Some(dict)),
                _ => parent,
            };
            let matrix = stream
                .dict
                .get(b"Matrix")
                .ok()
                .and_then(|o| matrix_values(resolve(doc, o)))
                .unwrap_or([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
            forms.insert(
                id,
                FormXObject {
                    content: stream_bytes(stream),
                    matrix,
                    resources: own,
                },
            );
        }
        tracing::trace!(
            fonts = resources.fonts.len(),
            forms = forms.len(),
            "page resources resolved"
        );

        Self {
            content,
            resources,
            forms,
        }
    }
}

struct Resolver<'a> {
    doc: &'a lopdf::Document,
    /// Decoders of indirect font objects, shared between resource scopes.
    fonts: HashMap<lopdf::ObjectId, Arc<FontDecoder>>,
    /// Form XObjects still to load, with the resources they inherit.
    pending: Vec<(FormId, PageResources)>,
}

impl Resolver<'_> {
    fn resources(&mut self, dict: Option<&lopdf::Dictionary>) -> PageResources {
        let mut resources = PageResources::default();
        let Some(dict) = dict else {
            return resources;
        };

        if let Some(fonts) = subdictionary(self.doc, dict, b"Font") {
            for (name, obj) in fonts.iter() {
                if let Some(decoder) = self.font(obj) {
                    resources
                        .fonts
                        .insert(String::from_utf8_lossy(name).into_owned(), decoder);
                }
            }
        }

        let mut queued = Vec::new();
        if let Some(xobjects) = subdictionary(self.doc, dict, b"XObject") {
            for (name, obj) in xobjects.iter() {
                let lopdf::Object::Reference(id) = obj else {
                    continue;
                };
                if self.is_form(*id) {
                    resources
                        .forms
                        .insert(String::from_utf8_lossy(name).into_owned(), *id);
                    queued.push(*id);
                }
            }
        }
        for id in queued {
            self.pending.push((id, resources.clone()));
        }
        resources
    }

    fn font(&mut self, obj: &lopdf::Object) -> Option<Arc<FontDecoder>> {
        match obj {
            lopdf::Object::Reference(id) => {
                if let Some(cached) = self.fonts.get(id) {
                    return Some(Arc::clone(cached));
                }
                let dict = self.doc.get_object(*id).ok()?.as_dict().ok()?;
                let decoder = Arc::new(FontDecoder::from_dict(self.doc, dict));
                self.fonts.insert(*id, Arc::clone(&decoder));
                Some(decoder)
            }
            lopdf::Object::Dictionary(dict) => {
                Some(Arc::new(FontDecoder::from_dict(self.doc, dict)))
            }
            _ => None,
        }
    }

    fn is_form(&self, id: lopdf::ObjectId) -> bool {
        match self.doc.get_object(id) {
            Ok(lopdf::Object::Stream(stream)) => stream
                .dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .is_ok_and(|name| name == b"Form"),
            _ => false,
        }
    }
}

fn subdictionary<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Option<&'a lopdf::Dictionary> {
    match dict.get(key).map(|o| resolve(doc, o)) {
        Ok(lopdf::Object::Dictionary(sub)) => Some(sub),
        _ => None,
    }
}

/// `/Resources` of the page or of the nearest ancestor that has one.
fn inherited_resources<'a>(
    doc: &'a lopdf::Document,
    page: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let mut node = page;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Some(dict) = subdictionary(doc, node, b"Resources") {
            return Some(dict);
        }
        match node.get(b"Parent").map(|o| resolve(doc, o)) {
            Ok(lopdf::Object::Dictionary(parent)) => node = parent,
            _ => return None,
        }
    }
    None
}

fn matrix_values(obj: &lopdf::Object) -> Option<[f64; 6]> {
    let lopdf::Object::Array(items) = obj else {
        return None;
    };
    let mut values = [0.0; 6];
    if items.len() != values.len() {
        return None;
    }
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = match item {
            lopdf::Object::Integer(i) => *i as f64,
            lopdf::Object::Real(r) => f64::from(*r),
            _ => return None,
        };
    }
    Some(values)
}
