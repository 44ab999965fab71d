pub mod colon_listing_parser;
