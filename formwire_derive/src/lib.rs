use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, LitStr, parse_macro_input, parse_quote};

#[proc_macro_derive(Form, attributes(form))]
pub fn derive_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive_form_expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_form_expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    match &input.data {
        Data::Struct(data_struct) => impl_form_struct(&input, data_struct),
        Data::Enum(data_enum) => impl_form_enum(&input, data_enum),
        Data::Union(_) => Err(syn::Error::new_spanned(
            name,
            "Union types are not supported",
        )),
    }
}

/// Options from `#[form(...)]` on a field or variant.
#[derive(Default)]
struct FormAttrs {
    rename: Option<String>,
    skip: bool,
}

fn parse_form_attrs(attrs: &[Attribute]) -> syn::Result<FormAttrs> {
    let mut result = FormAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                result.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                result.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `skip`"))
            }
        })?;
    }
    Ok(result)
}

/// Requires every type parameter to be a `FormValue` itself.
fn with_form_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: formwire::FormValue));
    }
    generics
}

fn impl_form_struct(
    input: &DeriveInput,
    data: &syn::DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => {
            return Err(syn::Error::new_spanned(
                name,
                "Unit structs are not supported",
            ));
        }
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Only named fields are supported",
            ));
        }
    };

    let mut field_info = Vec::new();
    let mut skipped_fields = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(
                field,
                "Only named fields are supported",
            ));
        };
        let attrs = parse_form_attrs(&field.attrs)?;

        if attrs.skip {
            if attrs.rename.is_some() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    format!("Field '{field_name}' cannot be both skipped and renamed"),
                ));
            }
            skipped_fields.push(field_name.clone());
            continue;
        }

        if let Some(rename) = &attrs.rename
            && (rename.is_empty() || rename.contains(['.', '[', ']']))
        {
            return Err(syn::Error::new_spanned(
                field_name,
                "rename must be a non-empty name without '.', '[' or ']'",
            ));
        }

        let form_name = attrs
            .rename
            .unwrap_or_else(|| field_name.unraw().to_string());
        field_info.push((field_name.clone(), field.ty.clone(), form_name));
    }

    let mut seen = std::collections::HashSet::new();
    for (field_name, _, form_name) in &field_info {
        if !seen.insert(form_name.as_str()) {
            return Err(syn::Error::new_spanned(
                field_name,
                format!("Duplicate form field name: {form_name}"),
            ));
        }
    }

    // Locals are numbered so that field names cannot shadow `reader` or
    // `errors`.
    let locals: Vec<_> = (0..field_info.len())
        .map(|i| format_ident!("__field_{}", i))
        .collect();

    let field_reads = field_info
        .iter()
        .zip(&locals)
        .map(|((_, ty, form_name), local)| {
            quote! {
                let #local = reader.read::<#ty>(#form_name, errors);
            }
        });

    let field_unwraps = field_info
        .iter()
        .zip(&locals)
        .map(|((field_name, _, _), local)| {
            quote! {
                #field_name: #local?
            }
        });

    let skipped_field_init = skipped_fields.iter().map(|field_name| {
        quote! {
            #field_name: ::core::default::Default::default()
        }
    });

    let field_writes = field_info.iter().map(|(field_name, _, form_name)| {
        quote! {
            writer.write(#form_name, &self.#field_name);
        }
    });

    let generics = with_form_bounds(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics formwire::FormValue for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn from_form(
                value: ::core::option::Option<&formwire::Value>,
                path: ::core::option::Option<&formwire::Path>,
                errors: &mut formwire::FieldErrors,
            ) -> ::core::option::Option<Self> {
                let reader = formwire::StructReader::new(value, path, errors)?;
                #(#field_reads)*

                ::core::option::Option::Some(Self {
                    #(#field_unwraps,)*
                    #(#skipped_field_init,)*
                })
            }

            #[allow(unused_mut)]
            fn to_form(&self) -> ::core::option::Option<formwire::Value> {
                let mut writer = formwire::StructWriter::new();
                #(#field_writes)*
                ::core::option::Option::Some(writer.finish())
            }
        }
    };

    Ok(expanded)
}

fn impl_form_enum(
    input: &DeriveInput,
    data: &syn::DataEnum,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let mut variant_info = Vec::new();

    for variant in &data.variants {
        let variant_name = &variant.ident;
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant_name,
                "Only unit variants are supported; each variant is one choice of a select",
            ));
        }

        let attrs = parse_form_attrs(&variant.attrs)?;
        if attrs.skip {
            return Err(syn::Error::new_spanned(
                variant_name,
                "Variants cannot be skipped",
            ));
        }
        let choice = attrs.rename.unwrap_or_else(|| variant_name.to_string());
        variant_info.push((variant_name.clone(), choice));
    }

    let mut seen = std::collections::HashSet::new();
    for (variant_name, choice) in &variant_info {
        if !seen.insert(choice.as_str()) {
            return Err(syn::Error::new_spanned(
                variant_name,
                format!("Duplicate choice: {choice}"),
            ));
        }
    }

    let parse_variants = variant_info.iter().map(|(variant_name, choice)| {
        quote! {
            #choice => ::core::option::Option::Some(Self::#variant_name),
        }
    });

    let write_variants = variant_info.iter().map(|(variant_name, choice)| {
        quote! {
            Self::#variant_name => #choice,
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics formwire::FormValue for #name #ty_generics #where_clause {
            fn from_form(
                value: ::core::option::Option<&formwire::Value>,
                path: ::core::option::Option<&formwire::Path>,
                errors: &mut formwire::FieldErrors,
            ) -> ::core::option::Option<Self> {
                let choice = <::std::string::String as formwire::FormValue>::from_form(
                    value, path, errors,
                )?;
                match choice.as_str() {
                    #(#parse_variants)*
                    _ => {
                        errors.report(path, formwire::FieldErrorKind::InvalidChoice(choice));
                        ::core::option::Option::None
                    }
                }
            }

            fn to_form(&self) -> ::core::option::Option<formwire::Value> {
                let choice = match self {
                    #(#write_variants)*
                };
                ::core::option::Option::Some(formwire::Value::from(choice))
            }
        }
    };

    Ok(expanded)
}
