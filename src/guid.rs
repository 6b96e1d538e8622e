//! Event identifiers.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Globally unique identifier of an event, as assigned by FMOD Studio at authoring time.
///
/// The layout matches `FMOD_GUID`, so the runtime can write into it directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Guid {
    /// First 32 bits.
    pub data1: u32,
    /// Next 16 bits.
    pub data2: u16,
    /// Next 16 bits.
    pub data3: u16,
    /// Final 64 bits, stored as bytes.
    pub data4: [u8; 8],
}

impl Guid {
    /// Creates an identifier from its four fields.
    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Returns a formatter producing the form printed by the event listing.
    ///
    /// Bytes of the final field are printed without zero padding, so `0x03` becomes `3`
    /// while `0xab` stays `ab`. Use the [`Display`] impl for the canonical form.
    #[must_use]
    pub fn listing(&self) -> Listing<'_> {
        Listing(self)
    }
}

impl Display for Guid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let [a, b, c, d, e, g, h, i] = self.data4;

        f.write_str(&format!(
            "{:08x}-{:04x}-{:04x}-{a:02x}{b:02x}-{c:02x}{d:02x}{e:02x}{g:02x}{h:02x}{i:02x}",
            self.data1, self.data2, self.data3
        ))
    }
}

/// Listing form of a [`Guid`]; see [`Guid::listing`].
#[derive(Clone, Copy, Debug)]
pub struct Listing<'guid>(&'guid Guid);

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let guid = self.0;
        let [a, b, c, d, e, g, h, i] = guid.data4;

        f.write_str(&format!(
            "{:x}-{:04x}-{:04x}-{a:x}{b:x}-{c:x}{d:x}{e:x}{g:x}{h:x}{i:x}",
            guid.data1, guid.data2, guid.data3
        ))
    }
}

#[cfg(test)]
mod test {
    use super::Guid;

    #[test]
    fn listing_small_bytes() {
        let guid = Guid::new(0xab, 0x1, 0x2, [0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xa]);

        assert_eq!(guid.listing().to_string(), "ab-0001-0002-34-56789a");
    }

    #[test]
    fn listing_does_not_pad_leading_field() {
        let guid = Guid::new(0x0000_0f00, 0xbeef, 0x0, [0; 8]);

        assert_eq!(guid.listing().to_string(), "f00-beef-0000-00-000000");
    }

    #[test]
    fn listing_keeps_both_digits_of_large_bytes() {
        let guid = Guid::new(
            0x1234_5678,
            0x9abc,
            0xdef0,
            [0x12, 0x03, 0xff, 0x10, 0x0f, 0x80, 0x00, 0x7e],
        );

        assert_eq!(guid.listing().to_string(), "12345678-9abc-def0-123-ff10f8007e");
    }

    #[test]
    fn canonical_form_is_padded() {
        let guid = Guid::new(0xab, 0x1, 0x2, [0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xa]);

        assert_eq!(guid.to_string(), "000000ab-0001-0002-0304-05060708090a");
    }
}
