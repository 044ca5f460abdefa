mod rsvp;
