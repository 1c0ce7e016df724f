mod driver_dto;

pub use driver_dto::{
    CreateDriverResponseDto, DriverRequestDto, DriverResponseDto, ListDriversQuery, LocationDto,
    NearbyDriverDto, NearbyDriversQuery, UpdateDriverResponseDto,
};
