pub mod item_dto;

pub use item_dto::{
    BulkCreateItemsDto, BulkCreateResultDto, ItemRequestDto, ItemResponseDto, ListItemsQuery,
    NewItem,
};
