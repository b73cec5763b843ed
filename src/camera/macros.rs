macro_rules! impl_feature_accessors {
    ($feature:expr,
     $get:ident, $set:ident,
     $get_norm:ident, $set_norm:ident,
     $get_abs:ident, $set_abs:ident,
     $range:ident) => {
        #[doc = concat!("Raw ", stringify!($get), " in device units")]
        pub fn $get(&self) -> Result<u32> {
            self.feature($feature)
        }

        #[doc = concat!("Writes a raw ", stringify!($get), " value, switching the feature to manual")]
        pub fn $set(&mut self, value: u32) -> Result<()> {
            self.set_feature($feature, value)
        }

        #[doc = concat!(stringify!($get), " mapped into [0, 1]")]
        pub fn $get_norm(&self) -> Result<f32> {
            self.feature_norm($feature)
        }

        pub fn $set_norm(&mut self, value: f32) -> Result<()> {
            self.set_feature_norm($feature, value)
        }

        #[doc = concat!(stringify!($get), " in physical units")]
        pub fn $get_abs(&self) -> Result<f32> {
            self.feature_abs($feature)
        }

        pub fn $set_abs(&mut self, value: f32) -> Result<()> {
            self.set_feature_abs($feature, value)
        }

        pub fn $range(&self) -> Result<feature::Range> {
            self.feature_range($feature)
        }
    };
}
