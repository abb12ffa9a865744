// Licensed under MIT
pub struct User;
