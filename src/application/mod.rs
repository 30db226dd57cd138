pub mod usercases;
