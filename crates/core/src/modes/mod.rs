//! Per-mode element handling.
//!
//! Each handler keys its nesting sentinels by a small role enum and looks
//! roles up by element name. Closures are processed in a fixed order after
//! every tag end, since several roles may close on the same `>`.

mod catalog_driver;
mod catalog_printer;
mod device;
mod driver;
mod option;

pub(crate) use catalog_driver::CatalogDriver;
pub(crate) use catalog_printer::CatalogPrinter;
pub(crate) use device::Device;
pub(crate) use driver::Driver;
pub(crate) use option::OptionDoc;

/// Value of an `id="prefix/VALUE"` attribute word, without prefix and
/// closing quote.
pub(crate) fn prefixed_id<'a>(word: &'a str, prefix: &str) -> Option<&'a str> {
    let at = word.find("id")?;
    let rest = &word[at + 2..];
    let start = rest.find(prefix)? + prefix.len();
    let value = &rest[start..];
    let mut chars = value.chars();
    chars.next_back();
    Some(chars.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_id_strips_prefix_and_quote() {
        assert_eq!(prefixed_id(r#"id="driver/ljet4""#, "driver/"), Some("ljet4"));
        assert_eq!(
            prefixed_id(r#"id='printer/HP-LaserJet_4'"#, "printer/"),
            Some("HP-LaserJet_4")
        );
        assert_eq!(prefixed_id(r#"id="opt/5""#, "driver/"), None);
        assert_eq!(prefixed_id(r#"type="enum""#, "driver/"), None);
    }
}
