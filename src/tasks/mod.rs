pub mod i2c_responder;
