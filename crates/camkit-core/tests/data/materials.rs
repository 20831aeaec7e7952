use camkit_core::data::materials::*;

#[test]
fn test_speed_factors() {
    assert_eq!(WorkMaterial::Aluminum.speed_factor(), 1.2);
    assert_eq!(WorkMaterial::Wood.speed_factor(), 1.5);
    assert_eq!(WorkMaterial::Titanium.speed_factor(), 0.6);
    assert_eq!(WorkMaterial::Other.speed_factor(), 1.0);
}

#[test]
fn test_unknown_material_uses_nominal_speed() {
    assert_eq!(WorkMaterial::from_name("unobtainium"), WorkMaterial::Other);
    assert_eq!(WorkMaterial::from_name("Aluminium"), WorkMaterial::Aluminum);
    assert!("unobtainium".parse::<WorkMaterial>().is_err());
}

#[test]
fn test_material_serde_names() {
    let json = serde_json::to_string(&WorkMaterial::Stainless).unwrap();
    assert_eq!(json, "\"stainless\"");
    let back: WorkMaterial = serde_json::from_str("\"brass\"").unwrap();
    assert_eq!(back, WorkMaterial::Brass);
}

#[test]
fn test_all_materials_listed() {
    assert_eq!(WorkMaterial::all().len(), 8);
    for material in WorkMaterial::all() {
        assert_eq!(WorkMaterial::from_name(&material.to_string()), *material);
    }
}
