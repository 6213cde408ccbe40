mod demographic;
mod electoral;
