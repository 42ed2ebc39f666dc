//! Default glyph catalog handed to the process-wide [`BulletCycler`](crate::kernel::bullet::BulletCycler).
//!
//! Treated as external data: the engine only indexes into it and reads its length.

pub const DEFAULT_GLYPHS: &[&str] = &[
    "🔴", "🟠", "🟡", "🟢", "🔵", "🟣", "🟤", "⚫", "⚪",
    "🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫", "⬛", "⬜",
    "🔶", "🔷", "🔸", "🔹", "🔺", "🔻", "💠", "🔘",
    "⭐", "🌙", "☀️", "⚡", "🔥", "💧", "🍀", "🌸",
    "🍎", "🍊", "🍋", "🍇", "🍒", "🥝",
];
