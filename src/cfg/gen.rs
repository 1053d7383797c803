macro_rules! _section_types {
    {
        $(
            $type_name:ident {
                $($field:ident: $type:ty = $default:expr,)*
            }
        )*
    } => {
        $(
            #[derive(Clone, Debug)]
            pub struct $type_name {
                $(pub $field: $type,)*
            }

            impl $type_name {
                const FIELD_NAMES: &'static [&'static str] = &[
                    $(std::stringify!($field),)*
                ];
            }

            impl std::default::Default for $type_name {
                fn default() -> Self {
                    use crate::cfg::{parse::Value, scanner::Scanner};
                    Self {
                        $(
                            $field: <$type>::parse(&mut Scanner::new($default))
                                .unwrap_or_else(|e| panic!(
                                    "bad built-in default for {}::{}: {:?}",
                                    std::stringify!($type_name),
                                    std::stringify!($field),
                                    e
                                )),
                        )*
                    }
                }
            }

            impl crate::cfg::parse::Section for $type_name {
                fn set(
                    &mut self,
                    section_name: &str,
                    field: &str,
                    scanner: &mut crate::cfg::scanner::Scanner,
                ) -> crate::cfg::parse::SetResult {
                    use crate::cfg::{error::Error, parse::{Value, SetError}};
                    match field {
                        $(
                            std::stringify!($field) => self.$field = <$type>::parse(scanner)
                                .map_err(SetError::InvalidValue)?,
                        )*
                        _ => {
                            let err = Error::new(format!(
                                "no field `{field}` in section `{section_name}`"
                            ));
                            let similar = crate::cfg::parse::most_similar(
                                field,
                                Self::FIELD_NAMES.iter().cloned(),
                            );
                            // The parser moves the label onto the key.
                            return Err(SetError::InvalidKey(match similar {
                                Some(similar) => err.with_label(0..0, format!(
                                    "help: a field with a similar name exists: `{similar}`"
                                )),
                                None => err,
                            }));
                        }
                    }
                    Ok(())
                }
            }
        )*
    }
}

macro_rules! _fixed_sections {
    {$($ident:ident: $type:ty => $section_path:expr,)*} => {
        #[derive(Default)]
        pub struct ParsedConfig {
            $(pub $ident: $type,)*
        }

        impl ParsedConfig {
            pub const SECTION_NAMES: &'static [&'static str] = &[$($section_path,)*];

            /// Looks up the `[name]` section that always exists.
            pub fn fixed_section(
                &mut self,
                path: &str,
            ) -> Option<&mut dyn crate::cfg::parse::Section> {
                match path {
                    $($section_path => Some(&mut self.$ident),)*
                    _ => None,
                }
            }
        }
    }
}

/// Generates the section structs listed under `sections`, each field parsed
/// through `Value` with a default given as config text, and a `ParsedConfig`
/// holding one instance per entry under `config`:
///
/// ```ignore
/// parsed_config! {
///     sections => {
///         Bar {
///             height: u16 = "40",
///         }
///     }
///     config => {
///         bar: Bar => "bar",
///     }
/// }
/// ```
macro_rules! parsed_config {
    {
        sections => {
            $($section_def:tt)*
        }
        config => {
            $($ident:ident: $type:ty => $section_path:expr,)*
        }
    } => {
        crate::cfg::gen::_section_types!($($section_def)*);
        crate::cfg::gen::_fixed_sections!($($ident: $type => $section_path,)*);
    }
}

pub(crate) use _fixed_sections;
pub(crate) use _section_types;
pub(crate) use parsed_config;
