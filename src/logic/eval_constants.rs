// Piece Values
pub const VAL_MAN: i32 = 10;
pub const VAL_SHAIKH: i32 = 50;
