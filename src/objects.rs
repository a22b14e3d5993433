//! Native object types constructible from scripts.
//!
//! The object system is deliberately closed: `(new (quote name))` only
//! recognizes the types listed here, and each type is configured through
//! its setter intrinsics — usually by folding `object_process` over a
//! quoted list of setter forms. Object data is shared and mutable in
//! place, so one object threads unchanged through a fold.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::language::Vec4;

/// One key of a keyframed track: a time plus up to four channel values.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveKey {
    pub time: f32,
    pub values: [f32; 4],
}

/// A keyframed track, e.g. particle size or color over normalized lifetime.
///
/// `stride` is the float count of each source key row, time included; it is
/// fixed by the first key and every later key must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub stride: usize,
    pub keys: Vec<CurveKey>,
}

/// Key rows may carry at most four channel values after the time.
pub const MAX_CURVE_STRIDE: usize = 5;

impl Curve {
    pub fn with_stride(stride: usize) -> Self {
        Curve {
            stride,
            keys: Vec::new(),
        }
    }

    /// Append a key; channels beyond the provided values stay zero.
    pub fn add_key(&mut self, time: f32, values: &[f32]) {
        let mut channels = [0.0f32; 4];
        for (slot, v) in channels.iter_mut().zip(values.iter()) {
            *slot = *v;
        }
        self.keys.push(CurveKey {
            time,
            values: channels,
        });
    }
}

/// A particle-emitter definition, filled in field by field from a script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitterDef {
    pub lifetime: f32,
    pub spawn_interval: f32,
    pub velocity: Vec4,
    pub color: Vec4,
    pub size_curve: Option<Curve>,
    pub color_curve: Option<Curve>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Emitter(EmitterDef),
    Curve(Curve),
}

impl ObjectData {
    /// Zeroed object for a registered type name, `None` for unknown names.
    pub fn create(type_name: &str) -> Option<ObjectData> {
        match type_name {
            "emitter" => Some(ObjectData::Emitter(EmitterDef::default())),
            "curve" => Some(ObjectData::Curve(Curve::default())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectData::Emitter(_) => "emitter",
            ObjectData::Curve(_) => "curve",
        }
    }
}

/// Shared mutable handle to native object data.
#[derive(Debug, Clone)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    pub fn new(data: ObjectData) -> Self {
        ObjectRef(Rc::new(RefCell::new(data)))
    }

    pub fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    pub fn type_name(&self) -> &'static str {
        self.borrow().type_name()
    }
}
