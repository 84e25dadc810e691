use super::{Shared, StorefrontBus, detach};
use crate::actions::{ModalContent, StorefrontAction, topics};
use crate::types::{ContactUpdate, DeliveryUpdate, PaymentMethod};
use larek_core::event_bus::{SubscriptionId, TopicPattern};

/// Which checkout stage a form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Payment and address
    Delivery,
    /// E-mail and phone
    Contacts,
}

impl FormKind {
    const fn errors_topic(self) -> &'static str {
        match self {
            Self::Delivery => topics::DELIVERY_ERRORS,
            Self::Contacts => topics::CONTACT_ERRORS,
        }
    }

    fn opened_by(self, content: &ModalContent) -> bool {
        matches!(
            (self, content),
            (Self::Delivery, ModalContent::DeliveryForm)
                | (Self::Contacts, ModalContent::ContactsForm)
        )
    }
}

/// Form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormModel {
    /// Submit button state
    pub valid: bool,
    /// Field messages joined with `"; "`
    pub errors: String,
    /// Highlighted payment button (delivery form only)
    pub payment: Option<PaymentMethod>,
}

/// One checkout form
#[derive(Debug)]
pub struct FormPanel {
    kind: FormKind,
    model: Shared<FormModel>,
    subscriptions: Vec<SubscriptionId>,
}

impl FormPanel {
    /// Subscribe to the stage's error notifications
    ///
    /// The contacts form also shows the reason of a rejected order; the submit
    /// button stays enabled so the order can be sent again.
    #[must_use]
    pub fn attach(bus: &StorefrontBus, kind: FormKind) -> Self {
        let model = Shared::new(FormModel::default());

        let target = model.clone();
        let on_errors = bus.subscribe(TopicPattern::exact(kind.errors_topic()), move |event| {
            let messages: Vec<&str> = match event {
                StorefrontAction::DeliveryErrorsChanged(errors) => {
                    errors.values().map(String::as_str).collect()
                },
                StorefrontAction::ContactErrorsChanged(errors) => {
                    errors.values().map(String::as_str).collect()
                },
                _ => return Ok(()),
            };
            target.update(|form| {
                form.valid = messages.is_empty();
                form.errors = messages.join("; ");
            });
            Ok(())
        });

        let target = model.clone();
        let on_open = bus.subscribe(TopicPattern::exact(topics::MODAL_OPEN), move |event| {
            let StorefrontAction::ModalOpened(content) = event else {
                return Ok(());
            };
            if kind.opened_by(content) {
                target.update(|form| *form = FormModel::default());
            }
            Ok(())
        });

        let mut subscriptions = vec![on_errors, on_open];
        if kind == FormKind::Contacts {
            let target = model.clone();
            subscriptions.push(bus.subscribe(
                TopicPattern::exact(topics::ORDER_FAILED),
                move |event| {
                    if let StorefrontAction::OrderFailed { reason } = event {
                        target.update(|form| form.errors.clone_from(reason));
                    }
                    Ok(())
                },
            ));
        }

        Self {
            kind,
            model,
            subscriptions,
        }
    }

    /// Which stage this form edits
    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    /// Current model
    #[must_use]
    pub fn snapshot(&self) -> FormModel {
        self.model.get()
    }

    /// Intent for typing into the address field
    #[must_use]
    pub fn input_address(&self, value: impl Into<String>) -> Option<StorefrontAction> {
        (self.kind == FormKind::Delivery)
            .then(|| StorefrontAction::UpdateDelivery(DeliveryUpdate::Address(value.into())))
    }

    /// Intent for a payment button; `None` if it is already active
    #[must_use]
    pub fn select_payment(&self, method: PaymentMethod) -> Option<StorefrontAction> {
        if self.kind != FormKind::Delivery || self.model.get().payment == Some(method) {
            return None;
        }
        self.model.update(|form| form.payment = Some(method));
        Some(StorefrontAction::UpdateDelivery(DeliveryUpdate::Payment(method)))
    }

    /// Intent for typing into the e-mail field
    #[must_use]
    pub fn input_email(&self, value: impl Into<String>) -> Option<StorefrontAction> {
        (self.kind == FormKind::Contacts)
            .then(|| StorefrontAction::UpdateContacts(ContactUpdate::Email(value.into())))
    }

    /// Intent for typing into the phone field
    #[must_use]
    pub fn input_phone(&self, value: impl Into<String>) -> Option<StorefrontAction> {
        (self.kind == FormKind::Contacts)
            .then(|| StorefrontAction::UpdateContacts(ContactUpdate::Phone(value.into())))
    }

    /// Intent for the submit button; `None` while the form is invalid
    #[must_use]
    pub fn submit(&self) -> Option<StorefrontAction> {
        self.model.get().valid.then_some(match self.kind {
            FormKind::Delivery => StorefrontAction::SubmitDelivery,
            FormKind::Contacts => StorefrontAction::SubmitOrder,
        })
    }

    /// Unsubscribe from `bus`
    pub fn detach(&self, bus: &StorefrontBus) {
        detach(bus, &self.subscriptions);
    }
}
