use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locate an accessible [`syn::Path`] for a `plaid_*` crate as seen from the
/// caller's Cargo.toml.
///
/// Derive output must name the mapper crate by a path that resolves in the
/// crate invoking the macro, which may depend on `plaid_mapper` directly or
/// only on the `plaid` facade.
///
/// # Example
///
/// ```rust
/// # use plaid_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("plaid_mapper"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested crate name begins with `plaid_` and the caller depends
///    on the facade `plaid`, return `::plaid::short_name`
///    (e.g. `plaid_mapper` -> `::plaid::mapper`).
/// 3. Repeat step 1-2 in `dev-dependencies`.
/// 4. Otherwise fall back to the absolute path `::crate_name`.
///
/// A crate referencing itself should declare `extern crate self as name;` so the
/// fallback path also works inside its own tests.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "plaid";
const CRATE_PREFIX: &str = "plaid_";

impl Manifest {
    fn get_manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        path.exists().then_some(path)
    }

    fn get_manifest_modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn read_manifest(path: &Path) -> Option<Document<Box<str>>> {
        let text = std::fs::read_to_string(path).ok()?.into_boxed_str();
        Document::parse(text).ok()
    }

    fn absolute(name: &str) -> syn::Path {
        let ident = syn::Ident::new(name, proc_macro2_span());
        let mut path = syn::Path::from(ident);
        path.leading_colon = Some(Default::default());
        path
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(name));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            let mut path = Self::absolute(FACADE_NAME);
            path.segments
                .push(syn::Ident::new(module, proc_macro2_span()).into());
            return Some(path);
        }
        None
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from this
    /// crate's Cargo.toml. See the type documentation for the resolution order.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(section)
                && let Some(val) = Self::find_in_deps(deps, name)
            {
                return val;
            }
        }
        Self::absolute(name)
    }

    /// Run `func` with the [`Manifest`] of the caller's Cargo.toml.
    ///
    /// Manifests are cached per path and re-read when the file changes. If no
    /// manifest can be read (e.g. outside cargo), `fallback` is returned.
    pub fn shared_or<R>(fallback: R, func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(manifest_path) = Self::get_manifest_path() else {
            return fallback;
        };
        let Some(modified_time) = Self::get_manifest_modified_time(&manifest_path) else {
            return fallback;
        };

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let Some(document) = Self::read_manifest(&manifest_path) else {
            return fallback;
        };
        let manifest = Manifest {
            manifest: document,
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }

    /// Shorthand for resolving one crate path, falling back to `::name`.
    pub fn shared(func: impl FnOnce(&Self) -> syn::Path) -> syn::Path {
        Self::shared_or(Self::absolute("plaid_mapper"), func)
    }
}

#[inline]
fn proc_macro2_span() -> proc_macro2::Span {
    proc_macro2::Span::call_site()
}

#[cfg(test)]
mod tests {
    use toml_edit::Document;

    use super::Manifest;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(Box::from(text)).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    fn render(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nplaid_mapper = \"0.0.1\"\n");
        assert_eq!(render(&m.get_crate_path("plaid_mapper")), "plaid_mapper");
    }

    #[test]
    fn facade_dependency() {
        let m = manifest("[dependencies]\nplaid = \"0.0.1\"\n");
        assert_eq!(render(&m.get_crate_path("plaid_mapper")), "plaid::mapper");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nplaid = \"0.0.1\"\n");
        assert_eq!(render(&m.get_crate_path("plaid_mapper")), "plaid::mapper");

        let m = manifest("[dependencies]\nserde = \"1\"\n");
        let path = m.get_crate_path("plaid_mapper");
        assert!(path.leading_colon.is_some());
        assert_eq!(render(&path), "plaid_mapper");
    }
}
