// Licensed under MIT
pub struct OrderItem;
