use crate::error::InternalError;
use sha2::{Digest, Sha256};
use std::{
    borrow::Cow,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
};
use thiserror::Error as ThisError;

///
/// FootprintError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FootprintError {
    /// Neither a result type nor a fallback type name was supplied.
    #[error("generated unit footprint requires a result type or result type name")]
    MissingResultType,
}

///
/// CanonicalTypeName
///
/// Fully qualified, injective rendering of a type handle: two handles render
/// the same name iff they compare equal. Display names may abbreviate and
/// collide; canonical names may not.
///

pub trait CanonicalTypeName {
    fn canonical_name(&self) -> Cow<'_, str>;
}

impl CanonicalTypeName for str {
    fn canonical_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CanonicalTypeName for String {
    fn canonical_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: CanonicalTypeName + ?Sized> CanonicalTypeName for &T {
    fn canonical_name(&self) -> Cow<'_, str> {
        (**self).canonical_name()
    }
}

///
/// ResultType
///
/// Result type of a generated unit: a resolved type handle, or the fallback
/// name of a type that is not resolvable at compile time.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResultType<T> {
    Resolved(T),
    Named(String),
}

///
/// NamedParam
///
/// One parameter of a generated unit. The name is informational only.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedParam<T> {
    ty: T,
    name: String,
}

impl<T> NamedParam<T> {
    #[must_use]
    pub fn new(ty: T, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn ty(&self) -> &T {
        &self.ty
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

///
/// CodegenFootprint
///
/// Identity of one generated callable unit: result type, ordered parameter
/// types, and an optional disambiguating tag.
///
/// Equality ignores parameter names and the fallback type name once a result
/// type is resolved; equal footprints may share one emitted unit.
///

#[derive(Clone, Debug)]
pub struct CodegenFootprint<T> {
    result: ResultType<T>,
    result_type_name: Option<String>,
    params: Vec<NamedParam<T>>,
    tag: Option<String>,
}

impl<T> CodegenFootprint<T> {
    pub fn new(
        result_type: Option<T>,
        result_type_name: Option<String>,
        params: Vec<NamedParam<T>>,
        tag: Option<String>,
    ) -> Result<Self, InternalError> {
        let result = match (result_type, &result_type_name) {
            (Some(ty), _) => ResultType::Resolved(ty),
            (None, Some(name)) => ResultType::Named(name.clone()),
            (None, None) => return Err(FootprintError::MissingResultType.into()),
        };

        Ok(Self {
            result,
            result_type_name,
            params,
            tag,
        })
    }

    #[must_use]
    pub const fn result_type(&self) -> &ResultType<T> {
        &self.result
    }

    #[must_use]
    pub fn result_type_name(&self) -> Option<&str> {
        self.result_type_name.as_deref()
    }

    #[must_use]
    pub const fn params(&self) -> &[NamedParam<T>] {
        self.params.as_slice()
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Add the result type and every parameter type to `out`.
    ///
    /// A result known only by name contributes nothing.
    pub fn collect_referenced_types(&self, out: &mut BTreeSet<T>)
    where
        T: Clone + Ord,
    {
        if let ResultType::Resolved(ty) = &self.result {
            out.insert(ty.clone());
        }
        for param in &self.params {
            out.insert(param.ty.clone());
        }
    }

    /// Stable digest of this footprint; equal footprints share a signature.
    ///
    /// Types are hashed by canonical name, so unequal footprints get distinct
    /// signatures even when their types display alike.
    #[must_use]
    pub fn signature(&self) -> FootprintSignature
    where
        T: CanonicalTypeName,
    {
        let mut hasher = Sha256::new();
        hasher.update(b"footprint:v1");

        match &self.result {
            ResultType::Resolved(ty) => {
                write_tag(&mut hasher, 0x01);
                write_str(&mut hasher, &ty.canonical_name());
            }
            ResultType::Named(name) => {
                write_tag(&mut hasher, 0x02);
                write_str(&mut hasher, name);
            }
        }

        write_len(&mut hasher, self.params.len());
        for param in &self.params {
            write_str(&mut hasher, &param.ty.canonical_name());
        }

        match &self.tag {
            Some(tag) => {
                write_tag(&mut hasher, 0x01);
                write_str(&mut hasher, tag);
            }
            None => write_tag(&mut hasher, 0x00),
        }

        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        FootprintSignature(out)
    }
}

impl<T: PartialEq> PartialEq for CodegenFootprint<T> {
    fn eq(&self, other: &Self) -> bool {
        self.result == other.result
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(left, right)| left.ty == right.ty)
            && self.tag == other.tag
    }
}

impl<T: Eq> Eq for CodegenFootprint<T> {}

impl<T: Hash> Hash for CodegenFootprint<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.result.hash(state);
        self.params.len().hash(state);
        for param in &self.params {
            param.ty.hash(state);
        }
        self.tag.hash(state);
    }
}

///
/// FootprintSignature
///
/// SHA-256 digest of a footprint; renders as lowercase hex.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FootprintSignature([u8; 32]);

impl FootprintSignature {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for FootprintSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

// Lengths past u32::MAX saturate.
fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update(u32::try_from(len).unwrap_or(u32::MAX).to_be_bytes());
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}
