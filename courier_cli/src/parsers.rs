pub fn parse_weight(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
        Ok(_) => Err(String::from("Weight must be a non-negative number")),
        Err(_) => Err(String::from("Invalid weight")),
    }
}
