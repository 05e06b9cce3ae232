use crate::config::StyleConfig;

#[derive(Clone, PartialEq, Eq)]
pub struct UploadImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadImage")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductContext {
    pub image_url: String,
    pub name: String,
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FittingInput {
    Manual {
        image: UploadImage,
        breed: String,
        size: Option<String>,
    },
    Profile {
        pet_id: String,
    },
}

impl FittingInput {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Manual { .. } => "manual",
            Self::Profile { .. } => "profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittingRequest {
    pub product: Option<ProductContext>,
    pub input: FittingInput,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text { name: &'static str, value: String },
    File { name: &'static str, image: UploadImage },
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => *name,
        }
    }

    fn text(name: &'static str, value: &str) -> Self {
        Self::Text {
            name,
            value: value.to_string(),
        }
    }
}

impl FittingRequest {
    /// Multipart fields in wire order. Absent and empty values are omitted.
    pub fn form_fields(&self) -> Vec<FormField> {
        let mut fields = Vec::new();

        if let Some(product) = &self.product {
            fields.push(FormField::text("product_image_url", &product.image_url));
            fields.push(FormField::text("product_name", &product.name));
            if let Some(size) = non_empty(product.size.as_deref()) {
                fields.push(FormField::text("product_size", size));
            }
        }

        match &self.input {
            FittingInput::Manual { image, breed, size } => {
                fields.push(FormField::File {
                    name: "user_image",
                    image: image.clone(),
                });
                fields.push(FormField::text("pet_breed", breed));
                if let Some(size) = non_empty(size.as_deref()) {
                    fields.push(FormField::text("pet_size", size));
                }
            }
            FittingInput::Profile { pet_id } => {
                fields.push(FormField::text("pet_id", pet_id));
            }
        }

        fields.push(FormField::text("background", &self.style.background));
        fields.push(FormField::text("weather", &self.style.weather));
        fields.push(FormField::text("tone", &self.style.tone));

        fields
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
