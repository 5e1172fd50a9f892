use crate::attrs::{ContainerAttrs, VariantAttrs, is_payload_field};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Data, DataEnum, DataStruct, DeriveInput, Expr, Fields, GenericArgument, LitStr, Member,
    PathArguments, Result as SynResult, Type,
};

pub(crate) fn expand(input: DeriveInput) -> SynResult<TokenStream2> {
    let cfg = ContainerAttrs::from_attrs(&input.attrs)?;
    let Some(center) = cfg.center.clone() else {
        return Err(syn::Error::new(
            input.ident.span(),
            "missing #[notify(center = ...)] on NotifyObject type",
        ));
    };

    match &input.data {
        Data::Enum(data) => expand_enum(&input, &cfg, &center, data),
        Data::Struct(data) => expand_struct(&input, &cfg, &center, data),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "#[derive(NotifyObject)] can only be used on enum or struct types",
        )),
    }
}

// 共用：notify_center 的实现，借助显式类型标注完成 Arc<具体类型> -> NotifyCenterRef 的转换
fn center_fn(center: &Expr) -> TokenStream2 {
    quote! {
        fn notify_center(&self) -> ::notify_core::center::NotifyCenterRef {
            let center: ::notify_core::center::NotifyCenterRef = #center;
            center
        }
    }
}

fn expand_enum(
    input: &DeriveInput,
    cfg: &ContainerAttrs,
    center: &Expr,
    data: &DataEnum,
) -> SynResult<TokenStream2> {
    if let Some(name) = &cfg.name {
        return Err(syn::Error::new(
            name.span(),
            "'name' is set per variant on enums, e.g. #[notify(name = \"...\")] on the variant",
        ));
    }
    if let Some(key) = &cfg.key {
        return Err(syn::Error::new(
            key.span(),
            "'key' requires a struct with a #[notify(payload)] field",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            input.ident.span(),
            "#[derive(NotifyObject)] requires at least one variant",
        ));
    }

    let ident = &input.ident;
    let mut name_arms = Vec::with_capacity(data.variants.len());

    for v in &data.variants {
        if !matches!(v.fields, Fields::Unit) {
            return Err(syn::Error::new(
                v.span(),
                "#[derive(NotifyObject)] supports only unit enum variants",
            ));
        }

        let v_ident = &v.ident;
        // 变体级覆盖或默认：EnumName.Variant
        let lit = match VariantAttrs::from_attrs(&v.attrs)?.name {
            Some(lit) => lit,
            None => LitStr::new(&format!("{ident}.{v_ident}"), v_ident.span()),
        };
        name_arms.push(quote! { Self::#v_ident => #lit });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let center_fn = center_fn(center);

    Ok(quote! {
        impl #impl_generics ::notify_core::notify_object::NotifyObject for #ident #ty_generics #where_clause {
            type Payload = ();

            fn name(&self) -> ::notify_core::channel::ChannelName {
                ::notify_core::channel::ChannelName::from(match self { #( #name_arms, )* })
            }

            #center_fn
        }
    })
}

fn expand_struct(
    input: &DeriveInput,
    cfg: &ContainerAttrs,
    center: &Expr,
    data: &DataStruct,
) -> SynResult<TokenStream2> {
    let ident = &input.ident;
    let name_lit = cfg
        .name
        .clone()
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    // 查找唯一的载荷字段
    let mut payload: Option<(Member, Type)> = None;
    for (index, field) in data.fields.iter().enumerate() {
        if !is_payload_field(&field.attrs)? {
            continue;
        }
        if payload.is_some() {
            return Err(syn::Error::new(
                field.span(),
                "only one field may be marked #[notify(payload)]",
            ));
        }
        let member = match &field.ident {
            Some(name) => Member::Named(name.clone()),
            None => Member::Unnamed(index.into()),
        };
        payload = Some((member, option_inner(&field.ty)?));
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let center_fn = center_fn(center);

    let Some((member, payload_ty)) = payload else {
        if let Some(key) = &cfg.key {
            return Err(syn::Error::new(
                key.span(),
                "'key' requires a #[notify(payload)] field",
            ));
        }
        return Ok(quote! {
            impl #impl_generics ::notify_core::notify_object::NotifyObject for #ident #ty_generics #where_clause {
                type Payload = ();

                fn name(&self) -> ::notify_core::channel::ChannelName {
                    ::notify_core::channel::ChannelName::from(#name_lit)
                }

                #center_fn
            }
        });
    };

    let key_lit = cfg
        .key
        .clone()
        .unwrap_or_else(|| LitStr::new("payload", ident.span()));

    Ok(quote! {
        impl #impl_generics ::notify_core::notify_object::NotifyObject for #ident #ty_generics #where_clause {
            const CAPABILITY: ::notify_core::notify_object::Capability =
                ::notify_core::notify_object::Capability::Informed;

            type Payload = #payload_ty;

            fn name(&self) -> ::notify_core::channel::ChannelName {
                ::notify_core::channel::ChannelName::from(#name_lit)
            }

            #center_fn

            fn user_info_key(&self) -> &str {
                #key_lit
            }

            fn payload(&self) -> ::std::option::Option<&Self::Payload> {
                ::std::option::Option::as_ref(&self.#member)
            }

            fn with_payload(&self, payload: ::std::option::Option<Self::Payload>) -> Self {
                let mut next = ::std::clone::Clone::clone(self);
                next.#member = payload;
                next
            }
        }
    })
}

// 取出 Option<T> 中的 T
fn option_inner(ty: &Type) -> SynResult<Type> {
    if let Type::Path(tp) = ty {
        if tp.qself.is_none() {
            if let Some(last) = tp.path.segments.last() {
                if last.ident == "Option" {
                    if let PathArguments::AngleBracketed(args) = &last.arguments {
                        if let Some(GenericArgument::Type(inner)) = args.args.first() {
                            if args.args.len() == 1 {
                                return Ok(inner.clone());
                            }
                        }
                    }
                }
            }
        }
    }
    Err(syn::Error::new(
        ty.span(),
        "#[notify(payload)] field must be of type Option<T>",
    ))
}
