use std::collections::HashMap;

pub const DIRECTION_MASK: u16 = 0x000F;

/// Cardinal step direction. The discriminants are the blocking bits carried in
/// the low nibble of a tile flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 0x1,
    Left = 0x2,
    Right = 0x4,
    Up = 0x8,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    pub fn bit(self) -> u16 {
        self as u16
    }

    /// Unit tile delta; screen space, so `Down` grows `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
        }
    }

    /// Direction for a single-axis unit delta, `None` for anything else.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            (0, -1) => Some(Self::Up),
            _ => None,
        }
    }

    /// Facing for an arbitrary delta; horizontal wins ties.
    pub fn facing_for(dx: f32, dy: f32) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx < 0.0 { Self::Left } else { Self::Right })
        } else {
            Some(if dy < 0.0 { Self::Up } else { Self::Down })
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
        }
    }
}

/// What a tile id without a flag entry (or with a `null` entry) resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFlagPolicy {
    /// Absent entries behave like empty floor.
    #[default]
    Open,
    /// Absent entries take this flag and go through the normal passability
    /// and directional checks. `Fallback(DIRECTION_MASK)` makes them solid.
    Fallback(u16),
}

impl MissingFlagPolicy {
    pub fn default_flag(self) -> u16 {
        match self {
            Self::Open => 0,
            Self::Fallback(flag) => flag,
        }
    }
}

/// Per-tile-id flag table for one tileset. `None` entries are explicit
/// `null`s, which are distinct from a stored zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileFlags {
    by_tile_id: HashMap<u32, u16>,
    null_entries: usize,
}

impl TileFlags {
    pub fn from_indexed(flags: Vec<Option<u16>>) -> Self {
        let mut by_tile_id = HashMap::with_capacity(flags.len());
        let mut null_entries = 0usize;
        for (tile_id, flag) in flags.into_iter().enumerate() {
            match flag {
                Some(flag) => {
                    by_tile_id.insert(tile_id as u32, flag);
                }
                None => null_entries += 1,
            }
        }
        Self {
            by_tile_id,
            null_entries,
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u16)>) -> Self {
        Self {
            by_tile_id: pairs.into_iter().collect(),
            null_entries: 0,
        }
    }

    pub fn get(&self, tile_id: u32) -> Option<u16> {
        self.by_tile_id.get(&tile_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_tile_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tile_id.is_empty()
    }

    pub fn null_entries(&self) -> usize {
        self.null_entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_bits_match_flag_layout() {
        assert_eq!(Direction::Down.bit(), 0x1);
        assert_eq!(Direction::Left.bit(), 0x2);
        assert_eq!(Direction::Right.bit(), 0x4);
        assert_eq!(Direction::Up.bit(), 0x8);
        let all = Direction::ALL.iter().fold(0u16, |acc, dir| acc | dir.bit());
        assert_eq!(all, DIRECTION_MASK);
    }

    #[test]
    fn delta_round_trips_through_from_delta() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(dir));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn facing_prefers_horizontal_on_tie() {
        assert_eq!(Direction::facing_for(3.0, 3.0), Some(Direction::Right));
        assert_eq!(Direction::facing_for(-2.0, 2.0), Some(Direction::Left));
        assert_eq!(Direction::facing_for(0.5, -4.0), Some(Direction::Up));
        assert_eq!(Direction::facing_for(0.0, 0.0), None);
    }

    #[test]
    fn null_entries_are_not_stored() {
        let flags = TileFlags::from_indexed(vec![Some(0), None, Some(1551), None]);
        assert_eq!(flags.get(0), Some(0));
        assert_eq!(flags.get(1), None);
        assert_eq!(flags.get(2), Some(1551));
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.null_entries(), 2);
    }

    #[test]
    fn policy_default_flags() {
        assert_eq!(MissingFlagPolicy::default(), MissingFlagPolicy::Open);
        assert_eq!(MissingFlagPolicy::Open.default_flag(), 0);
        assert_eq!(
            MissingFlagPolicy::Fallback(DIRECTION_MASK).default_flag(),
            0x000F
        );
    }
}
