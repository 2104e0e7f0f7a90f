use crate::{FontError, Glyph};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the little-endian bytes of a codepoint.
#[must_use]
pub fn fnv1a_64(codepoint: u32) -> u64 {
    codepoint
        .to_le_bytes()
        .iter()
        .fold(FNV_OFFSET_BASIS, |hash, &byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

/// Fixed-capacity, open-addressed map from codepoint to [`Glyph`].
///
/// The table is sized once at `ceil(1.5 * n) + 1` slots and filled with
/// linear probing. While inserting, the largest probe offset ever needed is
/// recorded as `max_probe`; a lookup scans at most `max_probe + 1` slots,
/// so a miss costs the same bounded number of probes as the worst hit.
///
/// There is no removal, so every key sits on the probe path of its hash
/// slot with no empty slot in between. This is what makes both the probe
/// bound and the duplicate check in [`GlyphTable::build`] sound.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    slots: Vec<Option<Glyph>>,
    max_probe: usize,
    len: usize,
}

impl GlyphTable {
    /// Builds a table holding every glyph of `glyphs`.
    ///
    /// # Errors
    /// Returns [`FontError::DuplicateCodepoint`] if two glyphs share a
    /// codepoint, or [`FontError::AllocationFailed`] if the slot array
    /// cannot be allocated.
    pub fn build<I>(glyphs: I) -> Result<Self, FontError>
    where
        I: IntoIterator<Item = Glyph>,
        I::IntoIter: ExactSizeIterator,
    {
        let glyphs = glyphs.into_iter();
        let count = glyphs.len();
        let capacity = count + count.div_ceil(2) + 1;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| FontError::AllocationFailed("glyph table"))?;
        slots.resize(capacity, None);

        let mut table = Self { slots, max_probe: 0, len: 0 };
        for glyph in glyphs {
            table.insert(glyph)?;
        }

        Ok(table)
    }

    fn insert(&mut self, glyph: Glyph) -> Result<(), FontError> {
        let capacity = self.slots.len();
        let start = self.home_slot(glyph.codepoint);

        for offset in 0..capacity {
            let slot = &mut self.slots[(start + offset) % capacity];
            match slot {
                Some(existing) if existing.codepoint == glyph.codepoint => {
                    return Err(FontError::DuplicateCodepoint(glyph.codepoint));
                },
                Some(_) => continue,
                None => {
                    *slot = Some(glyph);
                    self.max_probe = self.max_probe.max(offset);
                    self.len += 1;
                    return Ok(());
                },
            }
        }

        // capacity always exceeds the glyph count
        Err(FontError::AllocationFailed("glyph table slot"))
    }

    /// Looks up the glyph for `codepoint`, probing no further than
    /// [`max_probe`](Self::max_probe) slots past its hash slot.
    #[must_use]
    pub fn get(&self, codepoint: u32) -> Option<&Glyph> {
        let capacity = self.slots.len();
        let start = self.home_slot(codepoint);

        (0..=self.max_probe)
            .filter_map(|offset| self.slots[(start + offset) % capacity].as_ref())
            .find(|glyph| glyph.codepoint == codepoint)
    }

    fn home_slot(&self, codepoint: u32) -> usize {
        (fnv1a_64(codepoint) % self.slots.len() as u64) as usize
    }

    /// Number of slots in the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of glyphs stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest probe offset used by any insertion.
    #[must_use]
    pub fn max_probe(&self) -> usize {
        self.max_probe
    }

    /// Iterates over all stored glyphs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TexRect;

    fn glyph(codepoint: u32) -> Glyph {
        let x = codepoint as f32;
        Glyph::new(codepoint, TexRect { s: x, t: x + 1.0, p: 0.0, q: 1.0 }, codepoint % 3)
    }

    #[test]
    fn test_fnv1a_reference_values() {
        // FNV-1a 64 of the four bytes 00 00 00 00
        assert_eq!(fnv1a_64(0), 0x4d25_767f_9dce_13f5);
        assert_ne!(fnv1a_64(1), fnv1a_64(256));
    }

    #[test]
    fn test_capacity_is_one_and_a_half_plus_one() {
        assert_eq!(GlyphTable::build((0..0).map(glyph)).unwrap().capacity(), 1);
        assert_eq!(GlyphTable::build((0..3).map(glyph)).unwrap().capacity(), 6);
        assert_eq!(GlyphTable::build((0..4).map(glyph)).unwrap().capacity(), 7);
        assert_eq!(GlyphTable::build((0..256).map(glyph)).unwrap().capacity(), 385);
    }

    #[test]
    fn test_round_trip() {
        let codepoints: Vec<u32> = (0x20..0x7f).chain(0x2500..0x2580).chain([0x263a, 0x1f600]).collect();
        let table = GlyphTable::build(codepoints.iter().map(|&cp| glyph(cp))).unwrap();

        assert_eq!(table.len(), codepoints.len());
        for &cp in &codepoints {
            assert_eq!(table.get(cp), Some(&glyph(cp)), "lookup failed for U+{cp:04X}");
        }
    }

    #[test]
    fn test_miss_within_probe_bound() {
        let table = GlyphTable::build((0x20..0x7f).map(glyph)).unwrap();
        assert!(table.max_probe() < table.capacity());

        for cp in [0u32, 0x7f, 0x263a, 0x10ffff, u32::MAX] {
            assert_eq!(table.get(cp), None);
        }
    }

    #[test]
    fn test_empty_table_misses() {
        let table = GlyphTable::build(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get('a' as u32), None);
    }

    #[test]
    fn test_duplicate_codepoint_rejected() {
        let glyphs = vec![glyph(0x41), glyph(0x42), glyph(0x41)];
        match GlyphTable::build(glyphs) {
            Err(FontError::DuplicateCodepoint(cp)) => assert_eq!(cp, 0x41),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_iter_yields_every_glyph() {
        let table = GlyphTable::build((0..50).map(glyph)).unwrap();
        let mut seen: Vec<u32> = table.iter().map(|g| g.codepoint).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }
}
