use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, LitStr, Result as SynResult, Token};

// 类型级 #[notify(...)]：name / center / key
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub(crate) name: Option<LitStr>,
    pub(crate) center: Option<Expr>,
    pub(crate) key: Option<LitStr>,
}

impl ContainerAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> SynResult<Self> {
        let mut out = Self::default();

        for attr in notify_attrs(attrs) {
            for entry in parse_entries(attr)? {
                let (key, value) = split_assign(entry)?;
                match key.to_string().as_str() {
                    "name" => set_once(&mut out.name, lit_str(value, "name")?, &key)?,
                    "center" => set_once(&mut out.center, value, &key)?,
                    "key" => set_once(&mut out.key, lit_str(value, "key")?, &key)?,
                    _ => {
                        return Err(syn::Error::new(
                            key.span(),
                            "unknown key; expected 'name' | 'center' | 'key'",
                        ));
                    }
                }
            }
        }

        Ok(out)
    }
}

// 变体级 #[notify(name = "...")]
#[derive(Default)]
pub(crate) struct VariantAttrs {
    pub(crate) name: Option<LitStr>,
}

impl VariantAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> SynResult<Self> {
        let mut out = Self::default();

        for attr in notify_attrs(attrs) {
            for entry in parse_entries(attr)? {
                let (key, value) = split_assign(entry)?;
                if key != "name" {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key on variant; expected 'name'",
                    ));
                }
                set_once(&mut out.name, lit_str(value, "name")?, &key)?;
            }
        }

        Ok(out)
    }
}

// 字段级 #[notify(payload)]
pub(crate) fn is_payload_field(attrs: &[Attribute]) -> SynResult<bool> {
    let mut flagged = false;

    for attr in notify_attrs(attrs) {
        for entry in parse_entries(attr)? {
            match entry {
                Expr::Path(p) if p.path.is_ident("payload") => {
                    if flagged {
                        return Err(syn::Error::new(p.span(), "duplicate 'payload' flag"));
                    }
                    flagged = true;
                }
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "unknown field attribute; expected #[notify(payload)]",
                    ));
                }
            }
        }
    }

    Ok(flagged)
}

fn notify_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("notify"))
}

fn parse_entries(attr: &Attribute) -> SynResult<Punctuated<Expr, Token![,]>> {
    attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
}

// 拆分 `key = value`
fn split_assign(entry: Expr) -> SynResult<(Ident, Expr)> {
    match entry {
        Expr::Assign(assign) => match *assign.left {
            Expr::Path(p) if p.path.segments.len() == 1 => {
                Ok((p.path.segments[0].ident.clone(), *assign.right))
            }
            other => Err(syn::Error::new(other.span(), "invalid attribute key")),
        },
        other => Err(syn::Error::new(other.span(), "expected `key = value`")),
    }
}

fn lit_str(value: Expr, key: &str) -> SynResult<LitStr> {
    match value {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Ok(lit),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected string literal for '{key}'"),
        )),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> SynResult<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{key}' in attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}
