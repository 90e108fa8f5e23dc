//! Shop and menu conversion functions.

use crate::shopify::types::{Layout, Menu, MenuItem, Shop};

use super::super::queries::{MenuFields, MenuItemFields, layout};

fn convert_menu_item(item: MenuItemFields) -> MenuItem {
    MenuItem {
        id: item.id,
        title: item.title,
        url: item.url,
        items: item.items.into_iter().map(convert_menu_item).collect(),
    }
}

fn convert_menu(menu: MenuFields) -> Menu {
    Menu {
        id: menu.id,
        items: menu.items.into_iter().map(convert_menu_item).collect(),
    }
}

pub fn convert_layout(data: layout::ResponseData) -> Layout {
    Layout {
        shop: Shop {
            name: data.shop.name,
            primary_domain_url: data.shop.primary_domain.url,
        },
        header_menu: data.header.map(convert_menu),
        footer_menu: data.footer.map(convert_menu),
    }
}
