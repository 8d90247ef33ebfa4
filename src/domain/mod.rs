pub mod background;
pub mod countdown;
pub mod evasion;
pub mod particles;
