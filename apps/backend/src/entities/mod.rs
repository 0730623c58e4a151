pub mod cart_items;
pub mod carts;
pub mod items;
pub mod orders;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use cart_items::Model as CartItem;
pub use carts::Entity as Carts;
pub use carts::Model as Cart;
pub use items::Entity as Items;
pub use items::Model as Item;
pub use orders::Entity as Orders;
pub use orders::Model as Order;
pub use users::Entity as Users;
pub use users::Model as User;
